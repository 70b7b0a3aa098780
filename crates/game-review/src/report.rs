//! Plain-text season report per player

use std::fmt::Write;

use crate::stats::PlayerSeason;

pub fn render_report(season: &PlayerSeason) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, season);
    out
}

fn write_report(out: &mut String, season: &PlayerSeason) -> std::fmt::Result {
    writeln!(out, "REPORT: {}", season.display_name)?;
    writeln!(out, "{}", "=".repeat(30))?;
    writeln!(out)?;

    writeln!(out, "1. OPENING (games: {}):", season.games)?;
    if season.opening.is_empty() {
        writeln!(out, "- No serious errors.")?;
    }
    for (k, v) in &season.opening {
        writeln!(out, "- {k}: {v}")?;
    }

    writeln!(out)?;
    writeln!(out, "2. TACTICS (errors that changed the evaluation):")?;
    writeln!(out, "   Total errors: {}", season.total_tactical_errors())?;
    writeln!(
        out,
        "   Inaccuracies: {}, mistakes: {}, blunders: {}",
        season.inaccuracies, season.mistakes, season.blunders
    )?;
    for (k, v) in &season.tactics {
        writeln!(out, "- {k}: {v}")?;
    }

    writeln!(out)?;
    writeln!(out, "3. STRATEGY (recurring patterns):")?;
    for (k, v) in &season.strategy {
        writeln!(out, "- {k}: {v}")?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "4. TECHNIQUE (decisive advantage not converted): {}",
        season.conversion_failures
    )?;
    Ok(())
}

/// `Report_<name>.txt` with everything but alphanumerics, space, `_` and `-` dropped
pub fn report_file_name(display_name: &str) -> String {
    let safe: String = display_name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    let safe = safe.trim();
    if safe.is_empty() {
        "Report_unknown.txt".to_string()
    } else {
        format!("Report_{safe}.txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_sections() {
        let mut season = PlayerSeason::new("Anna Petrova");
        season.games = 7;
        season.record_tactic("Fork");
        season.record_tactic("Fork");
        season.record_tactic("Missed mate in 2");
        season.conversion_failures = 1;

        let text = render_report(&season);
        assert!(text.starts_with("REPORT: Anna Petrova\n"));
        assert!(text.contains("1. OPENING (games: 7):\n- No serious errors."));
        assert!(text.contains("Total errors: 3"));
        assert!(text.contains("- Fork: 2"));
        assert!(text.contains("- Missed mate in 2: 1"));
        assert!(text.contains("4. TECHNIQUE (decisive advantage not converted): 1"));
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name("Anna Petrova"), "Report_Anna Petrova.txt");
        assert_eq!(report_file_name("o'brien/../x"), "Report_obrienx.txt");
        assert_eq!(report_file_name("???"), "Report_unknown.txt");
    }
}
