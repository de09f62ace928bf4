//! `assetline build`: clean the output directory, run every pipeline once.

use std::sync::Arc;

use anyhow::{Result, bail};

use crate::config::ProjectConfig;
use crate::pipeline::PipelineContext;
use crate::reload::ReloadSender;
use crate::sequence::{BUILD_SEQUENCE, run_sequence};

/// Run the build sequence. Fails when clean fails or any category failed.
pub fn build(config: Arc<ProjectConfig>) -> Result<()> {
    let ctx = PipelineContext::new(config, ReloadSender::disabled())?;
    let summary = run_sequence(&BUILD_SEQUENCE, &ctx)?;

    if !summary.is_success() {
        let names: Vec<_> = summary.failed.iter().map(|c| c.name()).collect();
        bail!("build failed: {}", names.join(", "));
    }
    Ok(())
}
