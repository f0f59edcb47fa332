/// Definition lookup.
///
/// - [`method`]: finding a method declaration in a document, walking up
///   the inheritance chain on a miss.  The line scan sits behind the
///   [`DeclarationScanner`] trait so a parser-backed index can replace it.
/// - [`target`]: deciding which class a receiver expression (`$this`,
///   `parent`, `$var`, `ClassName`) refers to.
pub mod method;
pub mod target;

pub use method::{DeclarationScanner, MethodLocator};
pub use target::resolve_call_target;
