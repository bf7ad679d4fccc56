pub mod campaign;
pub mod domain;
pub mod grid;
pub mod job;
pub mod script;
pub mod submit;

pub use campaign::{
    CampaignConfig, CampaignSummary, SubmitFailure, load_campaign_config, preview_script,
    render_campaign, render_campaign_summary, run_campaign,
};
pub use domain::{SigrunError, SigrunResult};
pub use grid::{GridPoint, MassRange, ParameterGrid, Rinv};
pub use job::{GeneratorCommand, JobDescriptor};
pub use script::{
    MailNotification, SlurmHeader, render_batch_script, script_file_name, script_path,
    write_batch_script,
};
pub use submit::{NullSubmitter, SbatchSubmitter, Submitter};
