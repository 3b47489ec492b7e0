// Banners and the end-of-batch summary

use std::path::Path;

use crate::arise::types::IdeaResult;
use crate::cli::console::preview;

fn rule(ch: char) -> String {
    ch.to_string().repeat(60)
}

pub fn batch_banner(idea_count: usize, model: &str) -> String {
    format!(
        "{rule}\n  ARISE Pipeline - Batch Mode\n  Ideas: {idea_count} | Model: {model}\n{rule}",
        rule = rule('=')
    )
}

pub fn interactive_banner() -> String {
    format!(
        "{rule}\n  ARISE Pipeline - Interactive Mode\n  Develop your idea through guided questioning.\n{rule}",
        rule = rule('=')
    )
}

/// Legacy synthesis block shown at the end of an interactive session
pub fn synthesis_block(synthesis: &str) -> String {
    format!("\n{rule}\n  SYNTHESIS\n{rule}\n{synthesis}", rule = rule('─'))
}

/// Header printed before each idea in a batch (1-based `index`)
pub fn idea_header(index: usize, total: usize, idea: &str) -> String {
    format!(
        "\n{rule}\n  IDEA {index}/{total}: {}\n{rule}",
        preview(idea, 60),
        rule = rule('─')
    )
}

/// Totals over a finished (or interrupted) batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub ideas: usize,
    pub total_phases: usize,
    pub generic_flags: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[IdeaResult]) -> Self {
        Self {
            ideas: results.len(),
            total_phases: results.iter().map(|r| r.phases_executed.len()).sum(),
            generic_flags: results.iter().map(|r| r.generic_flags.len()).sum(),
        }
    }

    pub fn average_phases(&self) -> f64 {
        if self.ideas == 0 {
            0.0
        } else {
            self.total_phases as f64 / self.ideas as f64
        }
    }

    pub fn render(&self, output: &Path) -> String {
        format!(
            "\n{rule}\n  PIPELINE COMPLETE\n  Ideas: {}\n  Total phases: {} (avg {:.1}/idea)\n  Generic flags: {}\n  Output: {}\n{rule}",
            self.ideas,
            self.total_phases,
            self.average_phases(),
            self.generic_flags,
            output.display(),
            rule = rule('=')
        )
    }
}
