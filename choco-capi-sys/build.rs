use std::env;
use std::error::Error;
use std::path::PathBuf;

fn main() {
    if let Err(e) = run() {
        fail(&e.to_string());
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("cargo::rerun-if-changed=build.rs");
    println!("cargo::rerun-if-env-changed=CHOCO_CAPI_DIR");
    println!("cargo::rerun-if-env-changed=CHOCO_BACKEND_C");

    let Some(capi_dir) = env::var_os("CHOCO_CAPI_DIR").map(PathBuf::from) else {
        // Without a location we can only hope the libraries are on the default search path.
        println!("cargo::warning=CHOCO_CAPI_DIR is not set, relying on the system library path");
        println!("cargo::rustc-link-lib=dylib=choco_backend");
        println!("cargo::rustc-link-lib=dylib=choco_capi");
        return Ok(());
    };

    if !capi_dir.is_dir() {
        return Err(format!("CHOCO_CAPI_DIR '{}' is not a directory", capi_dir.display()).into());
    }

    let backend_source = env::var_os("CHOCO_BACKEND_C")
        .map(PathBuf::from)
        .unwrap_or_else(|| capi_dir.join("backend.c"));

    if backend_source.is_file() {
        println!("cargo::rerun-if-changed={}", backend_source.display());
        cc::Build::new()
            .file(&backend_source)
            .include(&capi_dir)
            .warnings(false)
            .try_compile("choco_backend")?;
    } else {
        println!("cargo::rustc-link-lib=dylib=choco_backend");
    }

    println!("cargo::rustc-link-search=native={}", capi_dir.display());
    println!("cargo::rustc-link-lib=dylib=choco_capi");

    let target_os = env::var("CARGO_CFG_TARGET_OS")?;
    if target_os != "windows" {
        // The shared library is loaded from its build location at runtime.
        println!("cargo::rustc-link-arg=-Wl,-rpath,{}", capi_dir.display());
    }

    Ok(())
}

fn fail(s: &str) -> ! {
    eprintln!("\n\nerror occurred: {s}\n\n");
    std::process::exit(1);
}
