//! Campaign configuration and the render/submit loop over the signal grid.

use crate::domain::{SigrunError, SigrunResult};
use crate::grid::{GridPoint, ParameterGrid, Rinv};
use crate::job::{GeneratorCommand, JobDescriptor};
use crate::script::{SlurmHeader, render_batch_script, script_path, write_batch_script};
use crate::submit::Submitter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CampaignConfig {
    pub grid: ParameterGrid,
    pub generator: GeneratorCommand,
    pub slurm: SlurmHeader,
    #[serde(rename = "batchDir")]
    pub batch_dir: PathBuf,
    #[serde(rename = "submitCommand")]
    pub submit_command: String,
}

impl CampaignConfig {
    /// Guards only the surfaces the config layer itself introduces. Mass and
    /// rinv values are passed through unchecked; the scripts carry whatever
    /// the grid says.
    pub fn validate(&self) -> SigrunResult<()> {
        if self.grid.masses.step == 0 {
            return Err(SigrunError::ConfigInvalid(
                "mass range step must be non-zero".to_string(),
            ));
        }
        if self.batch_dir.as_os_str().is_empty() {
            return Err(SigrunError::ConfigInvalid(
                "batch directory must not be empty".to_string(),
            ));
        }
        if self.submit_command.trim().is_empty() {
            return Err(SigrunError::ConfigInvalid(
                "submit command must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            grid: ParameterGrid::default(),
            generator: GeneratorCommand::default(),
            slurm: SlurmHeader::default(),
            batch_dir: PathBuf::from("batch"),
            submit_command: "sbatch".to_string(),
        }
    }
}

pub fn load_campaign_config(config_path: impl AsRef<Path>) -> SigrunResult<CampaignConfig> {
    let config_path = config_path.as_ref();
    let source = fs::read_to_string(config_path).map_err(|source| SigrunError::ConfigRead {
        path: config_path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| SigrunError::ConfigParse {
        path: config_path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CampaignSummary {
    pub rendered: usize,
    pub submitted: usize,
    pub submit_failures: Vec<SubmitFailure>,
}

impl CampaignSummary {
    pub fn all_submitted(&self) -> bool {
        self.submit_failures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitFailure {
    pub mass: u32,
    pub rinv: Rinv,
    pub script: PathBuf,
    pub reason: String,
}

/// Renders every grid point and submits each written script. A write
/// failure aborts the run; a submission failure is recorded and the loop
/// moves on to the next grid point.
pub fn run_campaign(
    config: &CampaignConfig,
    submitter: &dyn Submitter,
) -> SigrunResult<CampaignSummary> {
    process_grid(config, Some(submitter))
}

/// Write-only pass: same ordering and abort behavior as [`run_campaign`],
/// nothing is handed to the scheduler.
pub fn render_campaign(config: &CampaignConfig) -> SigrunResult<CampaignSummary> {
    process_grid(config, None)
}

fn process_grid(
    config: &CampaignConfig,
    submitter: Option<&dyn Submitter>,
) -> SigrunResult<CampaignSummary> {
    config.validate()?;

    let mut summary = CampaignSummary::default();
    for point in config.grid.points() {
        let job = JobDescriptor::new(&config.generator, point);
        let command_line = job.command_line();
        info!("{}", command_line);

        let path = script_path(&config.batch_dir, point);
        let script = render_batch_script(&config.slurm, &command_line);
        write_batch_script(&path, &script).map_err(|source| SigrunError::ScriptWrite {
            path: path.clone(),
            source,
        })?;
        summary.rendered += 1;

        let Some(submitter) = submitter else {
            continue;
        };
        match submitter.submit(&path) {
            Ok(()) => summary.submitted += 1,
            Err(error) => {
                warn!("submission failed for '{}': {}", path.display(), error);
                summary.submit_failures.push(SubmitFailure {
                    mass: point.mass,
                    rinv: point.rinv,
                    script: path,
                    reason: error.to_string(),
                });
            }
        }
    }

    Ok(summary)
}

pub fn render_campaign_summary(summary: &CampaignSummary) -> String {
    let mut lines = Vec::new();
    let status = if summary.all_submitted() { "PASS" } else { "FAIL" };
    lines.push(format!("Campaign status: {}", status));
    lines.push(format!(
        "Scripts: {} rendered, {} submitted, {} submit failures",
        summary.rendered,
        summary.submitted,
        summary.submit_failures.len()
    ));
    for failure in &summary.submit_failures {
        lines.push(format!(
            "Submit failure {} (mass {}, rinv {}): {}",
            failure.script.display(),
            failure.mass,
            failure.rinv,
            failure.reason
        ));
    }
    lines.join("\n")
}

/// Expands one `(mass, rinv)` pair without touching the filesystem; used by
/// the preview surface.
pub fn preview_script(config: &CampaignConfig, point: GridPoint) -> (PathBuf, String) {
    let job = JobDescriptor::new(&config.generator, point);
    let path = script_path(&config.batch_dir, point);
    let script = render_batch_script(&config.slurm, &job.command_line());
    (path, script)
}

#[cfg(test)]
mod tests {
    use super::{
        CampaignConfig, SubmitFailure, load_campaign_config, preview_script, render_campaign,
        render_campaign_summary, run_campaign,
    };
    use crate::domain::{SigrunError, SigrunResult};
    use crate::grid::{GridPoint, MassRange, ParameterGrid, Rinv};
    use crate::submit::Submitter;
    use std::cell::RefCell;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    struct RecordingSubmitter {
        submitted: RefCell<Vec<PathBuf>>,
        fail_on: Option<&'static str>,
    }

    impl RecordingSubmitter {
        fn new() -> Self {
            Self {
                submitted: RefCell::new(Vec::new()),
                fail_on: None,
            }
        }

        fn failing_on(file_name: &'static str) -> Self {
            Self {
                submitted: RefCell::new(Vec::new()),
                fail_on: Some(file_name),
            }
        }

        fn submitted_file_names(&self) -> Vec<String> {
            self.submitted
                .borrow()
                .iter()
                .map(|path| {
                    path.file_name()
                        .expect("submitted path should have a file name")
                        .to_string_lossy()
                        .into_owned()
                })
                .collect()
        }
    }

    impl Submitter for RecordingSubmitter {
        fn submit(&self, script: &Path) -> SigrunResult<()> {
            if let Some(fail_on) = self.fail_on {
                if script.to_string_lossy().contains(fail_on) {
                    return Err(SigrunError::SubmitFailed {
                        command: "sbatch".to_string(),
                        status: "exit code 1".to_string(),
                    });
                }
            }
            self.submitted.borrow_mut().push(script.to_path_buf());
            Ok(())
        }
    }

    fn small_config(batch_dir: &Path) -> CampaignConfig {
        CampaignConfig {
            grid: ParameterGrid {
                masses: MassRange {
                    start: 1000,
                    stop: 1200,
                    step: 100,
                },
                rinv_values: vec![Rinv(0.5), Rinv(1.0)],
            },
            batch_dir: batch_dir.to_path_buf(),
            ..CampaignConfig::default()
        }
    }

    #[test]
    fn run_campaign_writes_and_submits_in_grid_order() {
        let temp = TempDir::new().expect("tempdir should be created");
        let config = small_config(temp.path());
        let submitter = RecordingSubmitter::new();

        let summary = run_campaign(&config, &submitter).expect("campaign should run");

        assert_eq!(summary.rendered, 4);
        assert_eq!(summary.submitted, 4);
        assert!(summary.all_submitted());
        assert_eq!(
            submitter.submitted_file_names(),
            vec![
                "run_monojet_1000_0.5.batch",
                "run_monojet_1000_1.0.batch",
                "run_monojet_1100_0.5.batch",
                "run_monojet_1100_1.0.batch",
            ]
        );

        let first = fs::read_to_string(temp.path().join("run_monojet_1000_0.5.batch"))
            .expect("first script should be readable");
        assert!(first.starts_with("#!/bin/bash\n"));
        assert!(first.contains("-inv 0.5"));
        assert!(first.contains("Zprime_MZ_1000_gX_1_gq_0p1_rinv_0.5"));
        assert!(first.ends_with('\n'));
    }

    #[test]
    fn submit_failure_is_recorded_and_the_run_continues() {
        let temp = TempDir::new().expect("tempdir should be created");
        let config = small_config(temp.path());
        let submitter = RecordingSubmitter::failing_on("run_monojet_1000_1.0");

        let summary = run_campaign(&config, &submitter).expect("campaign should run to the end");

        assert_eq!(summary.rendered, 4);
        assert_eq!(summary.submitted, 3);
        assert_eq!(summary.submit_failures.len(), 1);

        let failure = &summary.submit_failures[0];
        assert_eq!(failure.mass, 1000);
        assert_eq!(failure.rinv.to_string(), "1.0");
        assert!(failure.reason.contains("exit code 1"));

        // Rejected scripts stay on disk and later grid points still submit.
        assert!(temp.path().join("run_monojet_1000_1.0.batch").is_file());
        assert_eq!(
            submitter.submitted_file_names().last().map(String::as_str),
            Some("run_monojet_1100_1.0.batch")
        );
    }

    #[test]
    fn missing_batch_dir_aborts_before_any_submission() {
        let temp = TempDir::new().expect("tempdir should be created");
        let config = small_config(&temp.path().join("does-not-exist"));
        let submitter = RecordingSubmitter::new();

        let error = run_campaign(&config, &submitter)
            .expect_err("campaign should abort when the batch dir is missing");

        assert!(matches!(error, SigrunError::ScriptWrite { .. }));
        assert_eq!(error.exit_code(), 3);
        assert!(submitter.submitted.borrow().is_empty());
    }

    #[test]
    fn render_campaign_writes_without_submitting() {
        let temp = TempDir::new().expect("tempdir should be created");
        let config = small_config(temp.path());

        let summary = render_campaign(&config).expect("render pass should succeed");

        assert_eq!(summary.rendered, 4);
        assert_eq!(summary.submitted, 0);
        assert!(summary.all_submitted());
        for name in [
            "run_monojet_1000_0.5.batch",
            "run_monojet_1000_1.0.batch",
            "run_monojet_1100_0.5.batch",
            "run_monojet_1100_1.0.batch",
        ] {
            assert!(temp.path().join(name).is_file(), "{name} should be written");
        }
    }

    #[test]
    fn validation_rejects_zero_mass_step() {
        let mut config = CampaignConfig::default();
        config.grid.masses.step = 0;

        let error = config
            .validate()
            .expect_err("zero step should be rejected before the loop starts");
        assert!(matches!(error, SigrunError::ConfigInvalid(_)));
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn config_file_overrides_merge_with_defaults() {
        let temp = TempDir::new().expect("tempdir should be created");
        let config_path = temp.path().join("campaign.json");
        fs::write(
            &config_path,
            r#"
            {
              "grid": {
                "masses": { "start": 500, "stop": 700, "step": 100 },
                "rinvValues": [0.3]
              },
              "batchDir": "scratch/batch",
              "slurm": { "partition": "shared" }
            }
            "#,
        )
        .expect("config file should be written");

        let config = load_campaign_config(&config_path).expect("config should load");

        assert_eq!(config.grid.masses.start, 500);
        assert_eq!(config.grid.rinv_values, vec![Rinv(0.3)]);
        assert_eq!(config.batch_dir, PathBuf::from("scratch/batch"));
        assert_eq!(config.slurm.partition, "shared");
        // Unstated fields keep the stock campaign values.
        assert_eq!(config.submit_command, "sbatch");
        assert_eq!(config.generator.events, 50_000);
        assert_eq!(config.slurm.wall_time, "20:00:00");
    }

    #[test]
    fn config_load_failures_map_to_distinct_errors() {
        let temp = TempDir::new().expect("tempdir should be created");

        let missing = load_campaign_config(temp.path().join("absent.json"))
            .expect_err("missing file should fail to read");
        assert!(matches!(missing, SigrunError::ConfigRead { .. }));

        let malformed_path = temp.path().join("broken.json");
        fs::write(&malformed_path, "{ not json").expect("file should be written");
        let malformed = load_campaign_config(&malformed_path)
            .expect_err("malformed file should fail to parse");
        assert!(matches!(malformed, SigrunError::ConfigParse { .. }));
    }

    #[test]
    fn default_config_serializes_with_camel_case_keys() {
        let value =
            serde_json::to_value(CampaignConfig::default()).expect("config should serialize");

        assert_eq!(value["batchDir"], "batch");
        assert_eq!(value["submitCommand"], "sbatch");
        assert_eq!(value["slurm"]["wallTime"], "20:00:00");
        assert_eq!(value["slurm"]["tasksPerNode"], 1);
        assert_eq!(value["generator"]["metMin"], 0);
        assert_eq!(value["generator"]["lheDir"], "/group/hepheno/hlou");
        assert_eq!(
            value["grid"]["rinvValues"]
                .as_array()
                .expect("rinv values should serialize as an array")
                .len(),
            13
        );

        let round_trip: CampaignConfig =
            serde_json::from_value(value).expect("serialized config should parse back");
        assert_eq!(round_trip, CampaignConfig::default());
    }

    #[test]
    fn summary_rendering_lists_failures() {
        let mut summary = super::CampaignSummary {
            rendered: 403,
            submitted: 402,
            submit_failures: vec![SubmitFailure {
                mass: 2500,
                rinv: Rinv(0.98),
                script: PathBuf::from("batch/run_monojet_2500_0.98.batch"),
                reason: "submit command 'sbatch' failed with exit code 1".to_string(),
            }],
        };

        let rendered = render_campaign_summary(&summary);
        assert!(rendered.starts_with("Campaign status: FAIL"));
        assert!(rendered.contains("403 rendered, 402 submitted, 1 submit failures"));
        assert!(rendered.contains("run_monojet_2500_0.98.batch"));
        assert!(rendered.contains("mass 2500, rinv 0.98"));

        summary.submit_failures.clear();
        summary.submitted = 403;
        let rendered = render_campaign_summary(&summary);
        assert!(rendered.starts_with("Campaign status: PASS"));
    }

    #[test]
    fn preview_expands_a_single_point_without_writing() {
        let config = CampaignConfig::default();
        let (path, script) = preview_script(
            &config,
            GridPoint {
                mass: 1000,
                rinv: Rinv(0.5),
            },
        );

        assert_eq!(path, PathBuf::from("batch/run_monojet_1000_0.5.batch"));
        assert!(script.starts_with("#!/bin/bash\n#SBATCH -N 1"));
        assert!(script.contains("-i /group/hepheno/hlou/Zprime_1000.lhe"));
        assert!(script.ends_with("Zprime_MZ_1000_gX_1_gq_0p1_rinv_0.5\n"));
    }
}
