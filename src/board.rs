use anyhow::{Context, Result};
use std::fmt::Write;

use crate::aggregate::AggregatedContributor;
use crate::rank::{progress_percentage, rank_badge};

const BAR_WIDTH: usize = 20;

/// Output format of the rendered board
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BoardFormat {
    Markdown,
    Json,
}

/// Renders a ranked contributor list
pub struct Board<'a> {
    contributors: &'a [AggregatedContributor],
}

impl<'a> Board<'a> {
    pub fn new(contributors: &'a [AggregatedContributor]) -> Self {
        Board { contributors }
    }

    pub fn render(&self, format: BoardFormat) -> Result<String> {
        match format {
            BoardFormat::Markdown => self.render_markdown(),
            BoardFormat::Json => self.render_json(),
        }
    }

    pub fn render_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self.contributors).context("Failed to serialize contributors")
    }

    pub fn render_markdown(&self) -> Result<String> {
        let mut output = String::new();

        writeln!(&mut output, "# Contributors\n")?;

        if self.contributors.is_empty() {
            writeln!(&mut output, "Contributor data is currently unavailable.")?;
            return Ok(output);
        }

        // Bars are relative to the top of the board
        let max = self
            .contributors
            .iter()
            .map(|c| c.total_contributions)
            .max()
            .unwrap_or(0);

        writeln!(&mut output, "| Rank | Contributor | Framework | Skeleton | Total | |")?;
        writeln!(&mut output, "|---|---|---:|---:|---:|---|")?;

        for contributor in self.contributors {
            let percentage = progress_percentage(contributor.total_contributions, max);
            writeln!(
                &mut output,
                "| {} | [{}]({}) | {} | {} | {} | `{}` |",
                rank_badge(contributor.rank),
                contributor.login,
                contributor.html_url,
                contributor.framework_contributions,
                contributor.skeleton_contributions,
                contributor.total_contributions,
                progress_bar(percentage),
            )?;
        }

        let total = self
            .contributors
            .iter()
            .fold(0u64, |acc, c| acc.saturating_add(c.total_contributions));
        writeln!(
            &mut output,
            "\n*{} contributors, {} contributions*",
            self.contributors.len(),
            total
        )?;

        Ok(output)
    }
}

fn progress_bar(percentage: f64) -> String {
    let filled = ((percentage / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::merge_contributors;
    use crate::github::contributor;

    #[test]
    fn test_render_markdown() {
        let contributors = merge_contributors(
            &[contributor("a", 10), contributor("c", 1)],
            &[contributor("a", 5), contributor("b", 20), contributor("d", 2)],
        );

        let output = Board::new(&contributors).render(BoardFormat::Markdown).unwrap();
        insta::assert_snapshot!(output, @r###"
        # Contributors

        | Rank | Contributor | Framework | Skeleton | Total | |
        |---|---|---:|---:|---:|---|
        | 🥇 | [b](https://github.com/b) | 0 | 20 | 20 | `████████████████████` |
        | 🥈 | [a](https://github.com/a) | 10 | 5 | 15 | `███████████████░░░░░` |
        | 🥉 | [d](https://github.com/d) | 0 | 2 | 2 | `██░░░░░░░░░░░░░░░░░░` |
        | #4 | [c](https://github.com/c) | 1 | 0 | 1 | `█░░░░░░░░░░░░░░░░░░░` |

        *4 contributors, 38 contributions*
        "###);
    }

    #[test]
    fn test_render_empty_board() {
        let output = Board::new(&[]).render_markdown().unwrap();
        assert!(output.contains("currently unavailable"));
    }

    #[test]
    fn test_render_huge_totals() {
        let contributors = merge_contributors(
            &[contributor("a", u64::MAX), contributor("b", u64::MAX)],
            &[],
        );

        let output = Board::new(&contributors).render_markdown().unwrap();
        assert!(output.contains(&format!("*2 contributors, {} contributions*", u64::MAX)));
    }

    #[test]
    fn test_render_json() {
        let contributors = merge_contributors(&[contributor("a", 1)], &[]);
        let output = Board::new(&contributors).render(BoardFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["login"], "a");
        assert_eq!(value[0]["totalContributions"], 1);
    }

    #[test]
    fn test_progress_bar_bounds() {
        assert_eq!(progress_bar(0.0), "░".repeat(BAR_WIDTH));
        assert_eq!(progress_bar(100.0), "█".repeat(BAR_WIDTH));
        assert_eq!(progress_bar(50.0).chars().filter(|c| *c == '█').count(), 10);
    }
}
