use anyhow::Result;
use hbnb::{logging, Config, Console, FileStorage, ScriptedEditor};
use std::io::{self, IsTerminal};
use tracing::info;

fn main() -> Result<()> {
    let config = Config::default();
    logging::init(&config.log_filter);

    let storage = FileStorage::open(&config.file_path)?;
    info!(version = hbnb::VERSION, objects = storage.len(), "console starting");

    let mut console = Console::new(storage, io::stdout());

    if io::stdin().is_terminal() {
        run_interactive(&mut console, &config)?;
    } else {
        let mut editor = ScriptedEditor::new(io::stdin().lock());
        console.run(&mut editor, &config.prompt)?;
    }

    console.into_storage().close()
}

#[cfg(feature = "editor")]
fn run_interactive(console: &mut Console<io::Stdout>, config: &Config) -> Result<()> {
    let mut editor = hbnb::console::RustylineEditor::new()?;
    console.run(&mut editor, &config.prompt)
}

// Without the line editor the prompt is printed by hand before each read
#[cfg(not(feature = "editor"))]
fn run_interactive(console: &mut Console<io::Stdout>, config: &Config) -> Result<()> {
    use hbnb::{LineEditor, ReadResult};
    use std::io::Write;

    struct PromptingEditor<R: io::BufRead>(ScriptedEditor<R>);

    impl<R: io::BufRead> LineEditor for PromptingEditor<R> {
        fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
            print!("{}", prompt);
            io::stdout().flush()?;
            self.0.read_line(prompt)
        }
    }

    let mut editor = PromptingEditor(ScriptedEditor::new(io::stdin().lock()));
    console.run(&mut editor, &config.prompt)
}
