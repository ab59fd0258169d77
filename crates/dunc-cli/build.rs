//! Embeds an rpath to libpython so `dunc` starts inside rez build shells,
//! which rarely export LD_LIBRARY_PATH for the interpreter.

fn main() {
    println!("cargo:rerun-if-env-changed=PYO3_PYTHON");
    println!("cargo:rerun-if-env-changed=DUNC_EXTRA_RPATH");

    let Ok(target) = std::env::var("TARGET") else {
        return;
    };

    let origin = if target.contains("apple-darwin") {
        "@executable_path"
    } else if target.contains("linux") {
        "$ORIGIN"
    } else {
        return;
    };

    // a rez package ships the binary in bin/ next to lib/
    add_rpath(origin);
    add_rpath(&format!("{origin}/../lib"));

    if let Ok(extra) = std::env::var("DUNC_EXTRA_RPATH") {
        for dir in std::env::split_paths(&extra) {
            add_rpath(&dir.to_string_lossy());
        }
    }

    if let Some(libdir) = python_config_var("LIBDIR") {
        add_rpath(&libdir);
    }
}

fn add_rpath(path: &str) {
    println!("cargo:rustc-link-arg=-Wl,-rpath,{path}");
}

/// Ask the build interpreter for a sysconfig variable
fn python_config_var(name: &str) -> Option<String> {
    let python = std::env::var("PYO3_PYTHON").ok()?;
    let script = format!("import sysconfig; print(sysconfig.get_config_var('{name}') or '')");
    let output = std::process::Command::new(&python)
        .args(["-c", &script])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8(output.stdout).ok()?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
