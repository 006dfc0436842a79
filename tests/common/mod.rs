// tests/common/mod.rs

//! Shared test utilities: a fake autotools source tree.
//!
//! `configure` records its arguments and the prefix; `fake-make` builds a
//! static library and installs it plus a header under the prefix. Every
//! phase appends its name to `phases.log` in the working directory.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CONFIGURE: &str = r#"#!/bin/sh
echo configure >> phases.log
printf '%s\n' "$@" > configure.args
for arg in "$@"; do
    case "$arg" in
        --prefix=*) printf '%s\n' "${arg#--prefix=}" > .prefix ;;
    esac
done
if [ -n "$FAIL_CONFIGURE" ]; then
    echo "configure: error: C compiler cannot create executables" >&2
    exit 77
fi
echo "checking for gcc... gcc"
"#;

const FAKE_MAKE: &str = r#"#!/bin/sh
prefix=$(cat .prefix)
if [ "$1" = "install" ]; then
    echo install >> phases.log
    if [ -n "$FAIL_INSTALL" ]; then
        echo "make: *** [install] Error 2" >&2
        exit 2
    fi
    mkdir -p "$prefix/lib/pkgconfig" "$prefix/include/demo"
    cp libdemo.a "$prefix/lib/libdemo.a"
    printf '#define DEMO_VERSION "1.0"\n' > "$prefix/include/demo/demo.h"
    printf 'prefix=%s\nName: demo\n' "$prefix" > "$prefix/lib/pkgconfig/demo.pc"
else
    echo build >> phases.log
    if [ -n "$KILL_BUILD" ]; then
        kill -9 $$
    fi
    echo "$MAKEFLAGS" > makeflags
    printf 'libdemo object code\n' > libdemo.a
fi
"#;

/// An extracted source tree with the build files under `source/`
pub struct FakeSource {
    pub dir: TempDir,
}

impl FakeSource {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let workdir = dir.path().join("source");
        fs::create_dir_all(&workdir).unwrap();
        write_executable(&workdir.join("configure"), CONFIGURE);
        write_executable(&workdir.join("fake-make"), FAKE_MAKE);
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn workdir(&self) -> PathBuf {
        self.dir.path().join("source")
    }

    /// Absolute path of the fake make program
    pub fn make_program(&self) -> String {
        self.workdir().join("fake-make").to_string_lossy().into_owned()
    }

    /// Phase names recorded by the scripts, in order
    pub fn phases_run(&self) -> Vec<String> {
        read_lines(&self.workdir().join("phases.log"))
    }

    /// Arguments configure was invoked with
    pub fn configure_args(&self) -> Vec<String> {
        read_lines(&self.workdir().join("configure.args"))
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(content) => content.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}

fn write_executable(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}
