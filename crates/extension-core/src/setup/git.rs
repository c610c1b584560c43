//! Template cloning through git

use crate::context::ExtensionContext;
use crate::error::{ExtensionError, Result};
use crate::process::Invocation;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};
use url::Url;

/// Shallow-clone `template` into `target_dir`, then drop the template's history
pub async fn clone_template(
    template: &Url,
    target_dir: &Path,
    context: &ExtensionContext,
) -> Result<()> {
    let clone_failed = |reason: String| ExtensionError::CloneFailed {
        template: template.to_string(),
        reason,
    };

    let invocation = Invocation::new("git")
        .args(["clone", "--depth", "1", template.as_str()])
        .arg(target_dir)
        .timeout(context.settings().clone_timeout);

    context
        .run(&invocation)
        .await
        .and_then(|output| output.into_success(&invocation))
        .map_err(|e| clone_failed(e.to_string()))?;

    let git_dir = target_dir.join(".git");
    if fs::try_exists(&git_dir).await.unwrap_or(false) {
        debug!(path = %git_dir.display(), "removing template history");
        fs::remove_dir_all(&git_dir).await.map_err(|e| {
            clone_failed(format!("could not remove {}: {}", git_dir.display(), e))
        })?;
    }

    info!(template = %template, target = %target_dir.display(), "template cloned");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::process::fake::{self, FakeRunner};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn template() -> Url {
        Url::parse("https://github.com/example/fake-template.git").unwrap()
    }

    #[tokio::test]
    async fn test_clone_runs_shallow_git_clone_and_strips_history() {
        let root = TempDir::new().unwrap();
        let target = root.path().join("my-extension");
        let runner = Arc::new(FakeRunner::new(|invocation| {
            let dest = Path::new(invocation.args.last().unwrap());
            std::fs::create_dir_all(dest.join(".git")).unwrap();
            std::fs::write(dest.join("package.json"), "{}").unwrap();
            fake::ok("")
        }));
        let ctx = ExtensionContext::with_runner(root.path(), runner.clone(), Settings::default());

        clone_template(&template(), &target, &ctx).await.unwrap();

        let calls = runner.calls_to("git");
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].args[..4],
            ["clone", "--depth", "1", "https://github.com/example/fake-template.git"]
        );
        assert!(target.join("package.json").exists());
        assert!(!target.join(".git").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_clone_passes_non_utf8_target_unchanged() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = TempDir::new().unwrap();
        let target = root.path().join(OsStr::from_bytes(b"ext-\xff"));
        let runner = Arc::new(FakeRunner::new(|_| fake::ok("")));
        let ctx = ExtensionContext::with_runner(root.path(), runner.clone(), Settings::default());

        clone_template(&template(), &target, &ctx).await.unwrap();

        let calls = runner.calls_to("git");
        assert_eq!(calls[0].args.last().unwrap(), target.as_os_str());
    }

    #[tokio::test]
    async fn test_clone_failure_is_reported() {
        let root = TempDir::new().unwrap();
        let runner = Arc::new(FakeRunner::new(|_| {
            fake::exit(128, "fatal: repository not found")
        }));
        let ctx = ExtensionContext::with_runner(root.path(), runner, Settings::default());

        let err = clone_template(&template(), &root.path().join("x"), &ctx)
            .await
            .unwrap_err();
        match err {
            ExtensionError::CloneFailed { template, reason } => {
                assert!(template.contains("fake-template.git"));
                assert!(reason.contains("repository not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
