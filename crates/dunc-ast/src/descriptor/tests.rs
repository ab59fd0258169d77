use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

const PACKAGE_PY: &str = r#"name = "demo"

version = "1.0.0"

requires = ["python-3"]

print("module level side effect")


def commands():
    env.PATH.append("{root}/bin")


class Helper:
    def install(self):
        pass


def build():
    print("building")


def install():
    import dunc

    dunc.install_files(dunc.find_files("*.py"))


def install():
    raise RuntimeError("second definition is never reached")
"#;

fn descriptor(content: &str) -> Descriptor {
    Descriptor::from_source("package.py", content)
        .unwrap_or_else(|e| panic!("descriptor should parse: {e}"))
}

#[test]
fn test_routine_names_are_top_level_only() {
    let names = descriptor(PACKAGE_PY).routine_names();
    assert_eq!(names, vec!["commands", "build", "install", "install"]);
}

#[test]
fn test_first_definition_wins() {
    let routine = descriptor(PACKAGE_PY)
        .find_routine("install")
        .unwrap_or_else(|| unreachable!());
    assert!(routine.text.starts_with("def install():"));
    assert!(routine.text.contains("dunc.install_files"));
    assert!(!routine.text.contains("second definition"));
    assert_eq!(routine.start_line, 23);
}

#[test]
fn test_slice_excludes_module_level_statements() {
    let routine = descriptor(PACKAGE_PY)
        .find_routine("build")
        .unwrap_or_else(|| unreachable!());
    assert_eq!(routine.text.trim_end(), "def build():\n    print(\"building\")");
    assert!(!routine.text.contains("side effect"));
}

#[test]
fn test_nested_definitions_are_ignored() {
    let content = r#"
class Package:
    def build(self):
        pass

if True:
    def build():
        pass

def outer():
    def build():
        pass
"#;
    let descriptor = descriptor(content);
    assert!(descriptor.find_routine("build").is_none());
    assert_eq!(descriptor.routine_names(), vec!["outer"]);
}

#[test]
fn test_async_definitions_are_ignored() {
    let descriptor = descriptor("async def build():\n    pass\n");
    assert!(descriptor.find_routine("build").is_none());
}

#[test]
fn test_decorators_are_part_of_the_slice() {
    let content = "import functools\n\n@functools.lru_cache()\ndef build():\n    return 1\n";
    let routine = descriptor(content)
        .find_routine("build")
        .unwrap_or_else(|| unreachable!());
    assert!(routine.text.starts_with("@functools.lru_cache()"));
    assert_eq!(routine.start_line, 3);
}

#[test]
fn test_lookup_optional_and_required() {
    let descriptor = descriptor("def install():\n    pass\n");

    let absent = descriptor.lookup("build", true);
    assert!(matches!(absent, Ok(None)));

    let missing = descriptor.lookup("build", false);
    assert!(matches!(missing, Err(ExtractError::NotFound(ref name)) if name == "build"));

    let present = descriptor.lookup("install", false);
    assert!(matches!(present, Ok(Some(ref r)) if r.name == "install"));
}

#[test]
fn test_parse_error_reports_line() {
    let content = "name = 'demo'\n\ndef build(:\n    pass\n";
    let err = Descriptor::from_source("package.py", content);
    assert!(matches!(err, Err(ExtractError::Parse { line, .. }) if line == 3));
}

#[test]
fn test_line_preserving_source() {
    let routine = RoutineSource {
        name: "build".to_string(),
        text: "def build():\n    pass".to_string(),
        start_line: 4,
    };
    assert_eq!(
        routine.line_preserving_source(),
        "\n\n\ndef build():\n    pass\n"
    );
}

#[test]
fn test_load_from_disk() {
    let mut file = NamedTempFile::new().unwrap_or_else(|e| panic!("temp file: {e}"));
    file.write_all(PACKAGE_PY.as_bytes())
        .unwrap_or_else(|e| panic!("write: {e}"));

    let descriptor =
        Descriptor::load(file.path()).unwrap_or_else(|e| panic!("load should succeed: {e}"));
    assert_eq!(descriptor.path(), file.path());
    assert!(descriptor.find_routine("build").is_some());
}

#[test]
fn test_load_missing_file() {
    let err = Descriptor::load(Path::new("/definitely/not/here/package.py"));
    assert!(matches!(err, Err(ExtractError::Read { .. })));
}
