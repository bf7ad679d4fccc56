use super::CliError;
use sigrun_core::{
    CampaignConfig, GridPoint, Rinv, SbatchSubmitter, load_campaign_config, preview_script,
    render_campaign, render_campaign_summary, run_campaign,
};
use std::path::PathBuf;
use tracing::info;

#[derive(clap::Args, Default)]
pub(super) struct CampaignFlags {
    /// Campaign config path; the stock campaign is used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory receiving the batch scripts
    #[arg(long)]
    batch_dir: Option<PathBuf>,
}

impl CampaignFlags {
    fn into_campaign(self) -> Result<CampaignConfig, CliError> {
        let mut config = match self.config {
            Some(path) => load_campaign_config(path).map_err(CliError::Compute)?,
            None => CampaignConfig::default(),
        };
        if let Some(batch_dir) = self.batch_dir {
            config.batch_dir = batch_dir;
        }
        Ok(config)
    }
}

#[derive(clap::Args)]
pub(super) struct SubmitArgs {
    #[command(flatten)]
    campaign: CampaignFlags,

    /// Scheduler command handed each written script
    #[arg(long)]
    submit_command: Option<String>,
}

#[derive(clap::Args)]
pub(super) struct RenderArgs {
    #[command(flatten)]
    campaign: CampaignFlags,
}

#[derive(clap::Args)]
pub(super) struct PreviewArgs {
    #[command(flatten)]
    campaign: CampaignFlags,

    /// Z' mass in GeV
    #[arg(long)]
    mass: u32,

    /// Invisible fraction of the dark shower
    #[arg(long)]
    rinv: f64,
}

#[derive(clap::Args)]
pub(super) struct ConfigArgs {
    #[command(flatten)]
    campaign: CampaignFlags,
}

pub(super) fn run_submit_command(args: SubmitArgs) -> Result<i32, CliError> {
    let mut config = args.campaign.into_campaign()?;
    if let Some(submit_command) = args.submit_command {
        config.submit_command = submit_command;
    }

    info!(
        "submitting {} grid points with '{}'",
        config.grid.len(),
        config.submit_command
    );
    let submitter = SbatchSubmitter::new(config.submit_command.clone());
    let summary = run_campaign(&config, &submitter).map_err(CliError::Compute)?;
    println!("{}", render_campaign_summary(&summary));

    if summary.all_submitted() { Ok(0) } else { Ok(4) }
}

pub(super) fn run_render_command(args: RenderArgs) -> Result<i32, CliError> {
    let config = args.campaign.into_campaign()?;
    let summary = render_campaign(&config).map_err(CliError::Compute)?;
    println!(
        "Rendered {} batch scripts into '{}'.",
        summary.rendered,
        config.batch_dir.display()
    );
    Ok(0)
}

pub(super) fn run_preview_command(args: PreviewArgs) -> Result<i32, CliError> {
    let config = args.campaign.into_campaign()?;
    let point = GridPoint {
        mass: args.mass,
        rinv: Rinv(args.rinv),
    };

    let (path, script) = preview_script(&config, point);
    println!("Script path: {}", path.display());
    print!("{}", script);
    Ok(0)
}

pub(super) fn run_config_command(args: ConfigArgs) -> Result<i32, CliError> {
    let config = args.campaign.into_campaign()?;
    let rendered = serde_json::to_string_pretty(&config).map_err(anyhow::Error::from)?;
    println!("{}", rendered);
    Ok(0)
}
