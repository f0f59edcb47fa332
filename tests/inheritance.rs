mod common;

use std::sync::Arc;

use common::MemoryProject;
use codeintel_nav::config::LanguageConfig;
use codeintel_nav::inheritance::InheritanceResolver;
use codeintel_nav::language::Language;
use codeintel_nav::search::DirectorySearcher;
use codeintel_nav::NavigationError;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

fn php() -> Language {
    Language::from_config(&LanguageConfig::php()).unwrap()
}

fn js() -> Language {
    Language::from_config(&LanguageConfig::javascript()).unwrap()
}

// ─── Parent name extraction ─────────────────────────────────────────────────

#[test]
fn test_no_extends_marker() {
    let text = "<?php\nclass Standalone\n{\n}\n";
    assert_eq!(php().parent_name(text), None);
}

#[test]
fn test_simple_extends() {
    let text = "<?php\n\nclass Admin extends User\n{\n}\n";
    assert_eq!(php().parent_name(text).as_deref(), Some("User"));
}

#[test]
fn test_extends_with_implements() {
    let text = "<?php\nfinal class Admin extends User implements Auditable, Countable\n{}\n";
    assert_eq!(php().parent_name(text).as_deref(), Some("User"));
}

#[test]
fn test_extends_with_glued_brace() {
    let text = "class Dialog extends Widget{\n}\n";
    assert_eq!(js().parent_name(text).as_deref(), Some("Widget"));
}

#[test]
fn test_extends_namespaced_parent() {
    let text = "<?php\nclass Post extends \\Illuminate\\Database\\Eloquent\\Model\n{}\n";
    assert_eq!(php().parent_name(text).as_deref(), Some("Model"));
}

#[test]
fn test_first_marker_wins() {
    let text = "<?php\nclass A extends B {}\nclass C extends D {}\n";
    assert_eq!(php().parent_name(text).as_deref(), Some("B"));
}

#[test]
fn test_marker_must_be_a_word() {
    // `extendsFoo` and `preextends` are not markers.
    let text = "<?php\n$extendsFoo = 1;\n$preextends Bar;\n";
    assert_eq!(php().parent_name(text), None);
}

#[test]
fn test_docblock_extends_tag_is_ignored() {
    let text = "<?php\n/**\n * @extends Factory<User>\n */\nclass UserFactory extends Factory\n{\n}\n";
    assert_eq!(php().parent_name(text).as_deref(), Some("Factory"));
}

#[test]
fn test_docblock_tag_alone_is_not_a_parent() {
    let text = "<?php\n/** @extends Collection<int, User> */\nclass Users\n{\n}\n";
    assert_eq!(php().parent_name(text), None);
}

#[test]
fn test_commented_out_extends_is_ignored() {
    let text = "<?php\n// class Old extends Legacy\n# class Older extends Ancient\nclass Fresh extends Base\n{}\n";
    assert_eq!(php().parent_name(text).as_deref(), Some("Base"));
}

#[test]
fn test_generic_arguments_are_cut() {
    let text = "class Store extends Repository<Item> {\n}\n";
    assert_eq!(js().parent_name(text).as_deref(), Some("Repository"));
}

// ─── Parent document resolution ─────────────────────────────────────────────

fn project() -> MemoryProject {
    MemoryProject::new(&[
        ("app/Admin.php", "<?php\nclass Admin extends User\n{\n}\n"),
        ("app/Models/User.php", "<?php\nclass User extends Base\n{\n}\n"),
        ("app/Root.php", "<?php\nclass Root\n{\n}\n"),
        ("app/Orphan.php", "<?php\nclass Orphan extends Missing\n{\n}\n"),
    ])
}

#[tokio::test]
async fn test_parent_found_by_search() {
    let project = Arc::new(project());
    let language = php();
    let listings = Semaphore::new(4);
    let searcher = DirectorySearcher::new(project.as_ref(), &listings, CancellationToken::new());
    let resolver = InheritanceResolver::new(&language, project.as_ref(), &searcher);

    let parent = resolver
        .parent(&project.document("app/Admin.php"))
        .await
        .unwrap()
        .expect("Admin has a parent");
    assert_eq!(parent.path, MemoryProject::path("app/Models/User.php"));
    assert!(parent.text.contains("class User"));
    assert!(!parent.is_open);
}

#[tokio::test]
async fn test_parent_prefers_open_document() {
    let project = Arc::new(project().with_open("app/Models/User.php"));
    let language = php();
    let listings = Semaphore::new(4);
    let searcher = DirectorySearcher::new(project.as_ref(), &listings, CancellationToken::new());
    let resolver = InheritanceResolver::new(&language, project.as_ref(), &searcher);

    let parent = resolver
        .parent(&project.document("app/Admin.php"))
        .await
        .unwrap()
        .unwrap();
    assert!(parent.is_open);
}

#[tokio::test]
async fn test_no_parent_resolves_none() {
    let project = Arc::new(project());
    let language = php();
    let listings = Semaphore::new(4);
    let searcher = DirectorySearcher::new(project.as_ref(), &listings, CancellationToken::new());
    let resolver = InheritanceResolver::new(&language, project.as_ref(), &searcher);

    let parent = resolver.parent(&project.document("app/Root.php")).await.unwrap();
    assert!(parent.is_none());
}

#[tokio::test]
async fn test_unlocatable_parent_is_an_error() {
    let project = Arc::new(project());
    let language = php();
    let listings = Semaphore::new(4);
    let searcher = DirectorySearcher::new(project.as_ref(), &listings, CancellationToken::new());
    let resolver = InheritanceResolver::new(&language, project.as_ref(), &searcher);

    let err = resolver
        .parent(&project.document("app/Orphan.php"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, NavigationError::FileNotFound { ref file_name } if file_name == "Missing.php")
    );
}
