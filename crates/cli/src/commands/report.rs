//! Report command: fetch, normalize, write CSV

use anyhow::{Context, Result};
use report_lib::csv::write_report_file;
use report_lib::{
    build_report, ApiSource, FileSource, KubectlSource, PodSource, ReportSettings, RunLogger,
    SourceKind,
};
use std::path::{Path, PathBuf};

use crate::output::{print_success, print_warning, render_rows};
use crate::{ReportArgs, SourceArg};

const VERSION: &str = env!("CARGO_PKG_VERSION");

impl From<SourceArg> for SourceKind {
    fn from(source: SourceArg) -> Self {
        match source {
            SourceArg::Kubectl => SourceKind::Kubectl,
            SourceArg::Api => SourceKind::Api,
        }
    }
}

/// Apply command line overrides on top of loaded settings
fn apply_overrides(mut settings: ReportSettings, args: &ReportArgs) -> ReportSettings {
    if let Some(source) = args.source {
        settings.source = source.into();
    }
    if let Some(namespace) = &args.namespace {
        settings.namespace = Some(namespace.clone());
    }
    if let Some(kubectl) = &args.kubectl {
        settings.kubectl = kubectl.clone();
    }
    settings
}

/// Kubeconfig path to hand to a source.
///
/// A `KUBECONFIG` list of several files is left to the default lookup.
fn single_kubeconfig(kubeconfig: Option<&str>) -> Option<PathBuf> {
    let value = kubeconfig.filter(|k| !k.is_empty())?;
    let mut paths = std::env::split_paths(value);
    let first = paths.next()?;
    match paths.next() {
        Some(_) => None,
        None => Some(first),
    }
}

fn make_source(
    settings: &ReportSettings,
    input: Option<&Path>,
    kubeconfig: Option<&str>,
) -> Box<dyn PodSource> {
    if let Some(path) = input {
        return Box::new(FileSource::new(path));
    }

    let kubeconfig = single_kubeconfig(kubeconfig);
    match settings.source {
        SourceKind::Kubectl => Box::new(
            KubectlSource::new(&settings.kubectl, settings.fetch_timeout())
                .with_kubeconfig(kubeconfig)
                .with_namespace(settings.namespace.clone()),
        ),
        SourceKind::Api => Box::new(
            ApiSource::new()
                .with_kubeconfig(kubeconfig)
                .with_namespace(settings.namespace.clone()),
        ),
    }
}

/// Run the report
pub async fn run(
    args: ReportArgs,
    kubeconfig: Option<String>,
    config_file: Option<&Path>,
) -> Result<()> {
    let settings = ReportSettings::load(config_file).context("Failed to load settings")?;
    let settings = apply_overrides(settings, &args);
    let logger = RunLogger::new();

    let source = make_source(&settings, args.input.as_deref(), kubeconfig.as_deref());
    logger.log_run_started(VERSION, &source.describe());

    let pods = source
        .fetch()
        .await
        .with_context(|| format!("Failed to fetch pods from {}", source.describe()))?;
    logger.log_pods_fetched(&source.describe(), pods.len());

    let report = build_report(&pods);
    let rows = report.rows();

    let path = settings.output_path(args.output.as_deref(), kubeconfig.as_deref());
    write_report_file(&path, &rows)
        .with_context(|| format!("Failed to write CSV file {}", path.display()))?;
    logger.log_report_written(&path, rows.len(), &report.summary);

    if let Some(format) = args.show {
        println!("{}", render_rows(&rows, format)?);
    }

    print_success(&format!("Resource data saved to {}", path.display()));
    if report.summary.normalization_failures > 0 {
        print_warning(&format!(
            "{} quantities could not be normalized and were reported as 0",
            report.summary.normalization_failures
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_settings() {
        let args = ReportArgs {
            source: Some(SourceArg::Api),
            namespace: Some("dev".into()),
            kubectl: Some("/opt/bin/kubectl".into()),
            ..Default::default()
        };

        let settings = apply_overrides(ReportSettings::default(), &args);

        assert_eq!(settings.source, SourceKind::Api);
        assert_eq!(settings.namespace.as_deref(), Some("dev"));
        assert_eq!(settings.kubectl, "/opt/bin/kubectl");
    }

    #[test]
    fn test_no_overrides_keep_settings() {
        let settings = apply_overrides(ReportSettings::default(), &ReportArgs::default());
        assert_eq!(settings, ReportSettings::default());
    }

    #[test]
    fn test_single_kubeconfig() {
        assert_eq!(single_kubeconfig(None), None);
        assert_eq!(single_kubeconfig(Some("")), None);
        assert_eq!(
            single_kubeconfig(Some("/home/ops/.kube/config")),
            Some(PathBuf::from("/home/ops/.kube/config"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_kubeconfig_list_uses_default_lookup() {
        assert_eq!(single_kubeconfig(Some("/a/config:/b/config")), None);
    }

    #[test]
    fn test_input_forces_file_source() {
        let source = make_source(
            &ReportSettings::default(),
            Some(Path::new("dump.json")),
            None,
        );
        assert_eq!(source.describe(), "dump.json");
    }

    #[test]
    fn test_default_source_is_kubectl() {
        let source = make_source(&ReportSettings::default(), None, None);
        assert_eq!(source.describe(), "kubectl get pods --all-namespaces -o json");
    }
}
