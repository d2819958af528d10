//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use std::fs;
    use std::path::Path;

    use assert_cmd::Command;
    use tempfile::TempDir;

    use crate::common::{build_archive, Part};

    fn write_archive(dir: &Path, name: &str) -> String {
        let archive = build_archive(&[
            Part::html(
                "https://example.com/",
                "<html><head><title>Saved</title></head><body><img src=\"dot.png\"></body></html>",
            ),
            Part::png("https://example.com/dot.png"),
        ]);
        let path = dir.join(name);
        fs::write(&path, archive).unwrap();
        path.display().to_string()
    }

    #[test]
    fn print_version() {
        let out = Command::cargo_bin(env!("CARGO_PKG_NAME"))
            .unwrap()
            .arg("--version")
            .output()
            .unwrap();

        assert_eq!(
            String::from_utf8_lossy(&out.stdout),
            format!("{} {}\n", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        );
        assert!(out.status.success());
    }

    #[test]
    fn output_next_to_input() {
        let dir = TempDir::new().unwrap();
        let input = write_archive(dir.path(), "page.mht");

        Command::cargo_bin(env!("CARGO_PKG_NAME"))
            .unwrap()
            .arg(&input)
            .assert()
            .success();

        let html = fs::read_to_string(dir.path().join("page.html")).unwrap();
        assert!(html.contains("<title>Saved</title>"));
        assert!(html.contains("data:image/png;base64,"));
    }

    #[test]
    fn explicit_output_gets_html_extension() {
        let dir = TempDir::new().unwrap();
        let input = write_archive(dir.path(), "page.mht");
        let output = dir.path().join("result");

        Command::cargo_bin(env!("CARGO_PKG_NAME"))
            .unwrap()
            .arg(&input)
            .arg("--output")
            .arg(&output)
            .assert()
            .success();

        assert!(dir.path().join("result.html").exists());
        assert!(!dir.path().join("page.html").exists());
    }

    #[test]
    fn several_inputs() {
        let dir = TempDir::new().unwrap();
        let first = write_archive(dir.path(), "one.mht");
        let second = write_archive(dir.path(), "two.mhtml");

        Command::cargo_bin(env!("CARGO_PKG_NAME"))
            .unwrap()
            .args([&first, &second])
            .assert()
            .success();

        assert!(dir.path().join("one.html").exists());
        assert!(dir.path().join("two.html").exists());
    }

    #[test]
    fn silent_run_writes_nothing_to_stderr() {
        let dir = TempDir::new().unwrap();
        let input = write_archive(dir.path(), "page.mht");

        let out = Command::cargo_bin(env!("CARGO_PKG_NAME"))
            .unwrap()
            .arg(&input)
            .arg("--silent")
            .output()
            .unwrap();

        assert!(out.status.success());
        assert!(out.stderr.is_empty());
    }
}

//  ███████╗ █████╗ ██╗██╗     ██╗███╗   ██╗ ██████╗
//  ██╔════╝██╔══██╗██║██║     ██║████╗  ██║██╔════╝
//  █████╗  ███████║██║██║     ██║██╔██╗ ██║██║  ███╗
//  ██╔══╝  ██╔══██║██║██║     ██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║██║███████╗██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod failing {
    use std::fs;

    use assert_cmd::Command;
    use tempfile::TempDir;

    use crate::common::{build_archive, Part};

    #[test]
    fn no_arguments() {
        let out = Command::cargo_bin(env!("CARGO_PKG_NAME"))
            .unwrap()
            .output()
            .unwrap();

        assert_eq!(out.status.code(), Some(2));
        assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));
    }

    #[test]
    fn nonexistent_input() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("missing.mht");

        let out = Command::cargo_bin(env!("CARGO_PKG_NAME"))
            .unwrap()
            .arg(&input)
            .env("NO_COLOR", "1")
            .output()
            .unwrap();

        assert_eq!(out.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&out.stderr)
            .contains(&format!("Error processing {}", input.display())));
    }

    #[test]
    fn one_bad_input_among_several() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.mht");
        fs::write(
            &good,
            build_archive(&[Part::html("https://example.com/", "<p>ok</p>")]),
        )
        .unwrap();
        let bad = dir.path().join("bad.mht");
        fs::write(&bad, build_archive(&[Part::png("https://example.com/dot.png")])).unwrap();

        let out = Command::cargo_bin(env!("CARGO_PKG_NAME"))
            .unwrap()
            .arg(&bad)
            .arg(&good)
            .output()
            .unwrap();

        assert_eq!(out.status.code(), Some(1));
        assert!(dir.path().join("good.html").exists());
        assert!(!dir.path().join("bad.html").exists());
    }

    #[test]
    fn output_overwriting_input() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("page.html");
        let archive = build_archive(&[Part::html("https://example.com/", "<p>ok</p>")]);
        fs::write(&input, &archive).unwrap();

        Command::cargo_bin(env!("CARGO_PKG_NAME"))
            .unwrap()
            .arg(&input)
            .arg("-o")
            .arg(&input)
            .assert()
            .failure();

        assert_eq!(fs::read(&input).unwrap(), archive);
    }
}
