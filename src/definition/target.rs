/// Receiver-to-class resolution.
///
/// Rules, first match wins:
///   1. `parent` resolves to the class named by the document's `extends`.
///   2. `$this` / `self` / `static` resolve to the current document.
///   3. `$var` resolves to `ClassName` when the document contains
///      `$var = new ClassName(...)`.
///   4. Anything else is taken as the class name itself, so `Foo::bar()`
///      looks for `Foo`.
use crate::error::NavigationError;
use crate::language::Language;
use crate::types::{CallTarget, SourceDocument};
use crate::util::short_class_name;

pub fn resolve_call_target(
    language: &Language,
    doc: &SourceDocument,
    receiver: &str,
) -> Result<CallTarget, NavigationError> {
    if language.is_parent_reference(receiver) {
        return language
            .parent_name(&doc.text)
            .map(CallTarget::Class)
            .ok_or_else(|| NavigationError::ParentNotDeclared {
                document: doc.path.clone(),
            });
    }

    if language.is_self_reference(receiver) {
        return Ok(CallTarget::SelfReference);
    }

    if let Some(class) = language.construction_site(receiver, &doc.text) {
        tracing::debug!("`{}` is constructed as {}", receiver, class);
        return Ok(CallTarget::Class(class));
    }

    Ok(CallTarget::Class(short_class_name(receiver).to_string()))
}
