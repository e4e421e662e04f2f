// Command Console - the `(hbnb) ` interpreter
//
// command    - line → Command (including the Class.method(args) rewrite)
// dispatcher - Command → storage operation + printed result
// editor     - where lines come from (terminal or script)

pub mod command;
pub mod dispatcher;
pub mod editor;

pub use command::{tokenize, Command};
pub use dispatcher::{CommandError, Console, Flow};
pub use editor::{LineEditor, ReadResult, ScriptedEditor};

#[cfg(feature = "editor")]
pub use editor::RustylineEditor;
