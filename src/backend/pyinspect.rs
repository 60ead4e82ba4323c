/// Python inspection tools: import analysis, cyclomatic metrics, bytecode
/// disassembly, package installation.
///
/// All four delegate to the configured interpreter — the interpreter's own
/// `ast`, `dis`, and `importlib` are the source of truth, and the helper
/// scripts emit JSON that is parsed on this side. The interpreter binary is
/// a setting (`python`), so virtualenvs work by pointing it at their python.
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tokio::process::Command;
use tokio::time::{Duration, timeout};

use super::{FunctionMetric, ImportInfo};

/// Inspection scripts should be instant; installs go to the network.
const INSPECT_TIMEOUT_SECS: u64 = 20;
const INSTALL_TIMEOUT_SECS: u64 = 300;

// ── Interpreter helper scripts ────────────────────────────────────────────────

/// Collect top-level imports and classify each module:
/// stdlib, installed (with version), local (importable but unversioned), or
/// missing.
const IMPORTS_SCRIPT: &str = r#"
import ast, json, sys
import importlib.util

tree = ast.parse(open(sys.argv[1], encoding="utf-8").read())
names = []
for node in ast.walk(tree):
    if isinstance(node, ast.Import):
        names.extend(alias.name.split(".")[0] for alias in node.names)
    elif isinstance(node, ast.ImportFrom) and node.module and node.level == 0:
        names.append(node.module.split(".")[0])

out, seen = [], set()
for name in names:
    if name in seen:
        continue
    seen.add(name)
    if name in sys.stdlib_module_names:
        status, version = "stdlib", None
    else:
        try:
            spec = importlib.util.find_spec(name)
        except (ImportError, ValueError):
            spec = None
        if spec is None:
            status, version = "missing", None
        else:
            try:
                from importlib.metadata import version as pkg_version
                version = pkg_version(name)
                status = "installed"
            except Exception:
                status, version = "local", None
    out.append({"name": name, "status": status, "version": version})

print(json.dumps(out))
"#;

/// Per-function cyclomatic complexity: 1 + the number of branch points.
const METRICS_SCRIPT: &str = r#"
import ast, json, sys

tree = ast.parse(open(sys.argv[1], encoding="utf-8").read())
BRANCHES = (ast.If, ast.For, ast.While, ast.ExceptHandler, ast.With, ast.Assert, ast.BoolOp, ast.IfExp)

out = []
for node in ast.walk(tree):
    if isinstance(node, (ast.FunctionDef, ast.AsyncFunctionDef)):
        score = 1 + sum(isinstance(child, BRANCHES) for child in ast.walk(node))
        out.append({"name": node.name, "line": node.lineno, "complexity": score})

out.sort(key=lambda m: m["line"])
print(json.dumps(out))
"#;

// ── Operations ────────────────────────────────────────────────────────────────

pub async fn analyze_imports(python: &str, path: &Path) -> Result<Vec<ImportInfo>> {
    let target = path.to_string_lossy();
    let stdout = run_python(
        python,
        &["-c", IMPORTS_SCRIPT, target.as_ref()],
        INSPECT_TIMEOUT_SECS,
    )
    .await?;
    serde_json::from_str(&stdout).context("unexpected import analysis output")
}

pub async fn code_metrics(python: &str, path: &Path) -> Result<Vec<FunctionMetric>> {
    let target = path.to_string_lossy();
    let stdout = run_python(
        python,
        &["-c", METRICS_SCRIPT, target.as_ref()],
        INSPECT_TIMEOUT_SECS,
    )
    .await?;
    serde_json::from_str(&stdout).context("unexpected metrics output")
}

pub async fn bytecode(python: &str, path: &Path) -> Result<String> {
    let target = path.to_string_lossy();
    run_python(python, &["-m", "dis", target.as_ref()], INSPECT_TIMEOUT_SECS).await
}

pub async fn install_package(python: &str, name: &str) -> Result<()> {
    run_python(
        python,
        &["-m", "pip", "install", name],
        INSTALL_TIMEOUT_SECS,
    )
    .await
    .map(|_| ())
}

async fn run_python(python: &str, args: &[&str], timeout_secs: u64) -> Result<String> {
    let fut = Command::new(python).args(args).output();
    let output = match timeout(Duration::from_secs(timeout_secs), fut).await {
        Ok(result) => result.with_context(|| format!("failed to run '{python}'"))?,
        Err(_) => anyhow::bail!("timed out after {timeout_secs}s"),
    };

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        // The last stderr line is usually the actual error (SyntaxError etc.)
        let message = stderr
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("interpreter error");
        Err(anyhow!("{message}"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
//
// These exercise the real interpreter and are skipped quietly when no
// `python3` is on PATH.

#[cfg(test)]
mod tests {
    use super::*;

    fn python_available() -> bool {
        std::process::Command::new("python3")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn imports_are_classified() {
        if !python_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.py");
        std::fs::write(
            &path,
            "import os\nimport os.path\nfrom json import loads\nimport definitely_not_a_module\n",
        )
        .unwrap();

        let imports = analyze_imports("python3", &path).await.unwrap();
        let find = |name: &str| imports.iter().find(|i| i.name == name).unwrap();

        assert_eq!(find("os").status, "stdlib");
        assert_eq!(find("json").status, "stdlib");
        assert_eq!(find("definitely_not_a_module").status, "missing");
        // `os` and `os.path` deduplicate to one row
        assert_eq!(imports.iter().filter(|i| i.name == "os").count(), 1);
    }

    #[tokio::test]
    async fn metrics_count_branches() {
        if !python_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.py");
        std::fs::write(
            &path,
            "def flat():\n    return 1\n\ndef branchy(x):\n    if x:\n        for _ in range(3):\n            pass\n    return x\n",
        )
        .unwrap();

        let metrics = code_metrics("python3", &path).await.unwrap();
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].name, "flat");
        assert_eq!(metrics[0].complexity, 1);
        assert_eq!(metrics[1].name, "branchy");
        assert_eq!(metrics[1].complexity, 3);
    }

    #[tokio::test]
    async fn syntax_errors_surface_as_messages() {
        if !python_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.py");
        std::fs::write(&path, "def broken(:\n").unwrap();

        let err = code_metrics("python3", &path).await.unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
