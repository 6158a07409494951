//! Text and JSON reports of rounds, matches and tournaments

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::game::{MatchResult, RoundResult};
use crate::tournament::TournamentResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    /// Tab-separated tables framed by banner lines
    #[default]
    Text,
    /// One JSON document per line
    Json,
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Event<'a> {
    Round { names: &'a [String], round: &'a RoundResult },
    Game { result: &'a MatchResult },
    Total { result: &'a TournamentResult },
}

/// Writes reports to a sink. With printing disabled every call is a no-op.
pub struct Reporter<W: Write> {
    out: W,
    format: Format,
    printing: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, format: Format) -> Self {
        Self { out, format, printing: true }
    }

    pub fn text(out: W) -> Self {
        Self::new(out, Format::Text)
    }

    pub fn json(out: W) -> Self {
        Self::new(out, Format::Json)
    }

    pub fn with_printing(mut self, printing: bool) -> Self {
        self.printing = printing;
        self
    }

    pub fn disable_printing(&mut self) {
        self.printing = false;
    }

    pub fn is_printing(&self) -> bool {
        self.printing
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn event(&mut self, event: &Event<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        writeln!(self.out)
    }

    /// One played round of a detailed match
    pub fn round(&mut self, names: &[String], round: &RoundResult) -> io::Result<()> {
        if !self.printing {
            return Ok(());
        }
        if self.format == Format::Json {
            return self.event(&Event::Round { names, round });
        }

        let out = &mut self.out;
        writeln!(out, "=================== ROUND #{} ==============", round.round)?;
        write!(out, "    NAMES    |")?;
        for name in names {
            write!(out, "\t{}", name)?;
        }
        writeln!(out)?;
        write!(out, "   CHOICES   |")?;
        for choice in &round.combination {
            write!(out, "\t{}", choice)?;
        }
        writeln!(out)?;
        write!(out, "ROUND SCORES |")?;
        for score in &round.scores {
            write!(out, "\t{}", score)?;
        }
        writeln!(out)?;
        write!(out, "TOTAL SCORES |")?;
        for total in &round.cumulative {
            write!(out, "\t{}", total)?;
        }
        writeln!(out)?;
        writeln!(out, "===========================================")
    }

    /// Final tally of one match
    pub fn game(&mut self, result: &MatchResult) -> io::Result<()> {
        if !self.printing {
            return Ok(());
        }
        if self.format == Format::Json {
            return self.event(&Event::Game { result });
        }

        let out = &mut self.out;
        writeln!(out, "=================== GAME RESULTS ==============")?;
        writeln!(out, "STEPS COUNT\t|\t{}", result.round_count)?;
        writeln!(out, "-----------------------------------------------")?;
        for entry in result.tally.entries() {
            writeln!(out, "{}\t|\t{}", entry.name, entry.score)?;
        }
        writeln!(out, "===============================================")
    }

    /// Aggregated tally of a tournament, winners flagged
    pub fn total(&mut self, result: &TournamentResult) -> io::Result<()> {
        if !self.printing {
            return Ok(());
        }
        if self.format == Format::Json {
            return self.event(&Event::Total { result });
        }

        let out = &mut self.out;
        writeln!(out, "================== TOTAL RESULTS ==============")?;
        for (index, entry) in result.totals.entries().iter().enumerate() {
            if result.winners.contains(&index) {
                writeln!(out, "{}\t|\t{}\t\t<--- WINNER", entry.name, entry.score)?;
            } else {
                writeln!(out, "{}\t|\t{}", entry.name, entry.score)?;
            }
        }
        writeln!(out, "==============================================")
    }
}

impl Reporter<io::Sink> {
    /// Reporter that never prints
    pub fn silent() -> Self {
        Self::text(io::sink()).with_printing(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choice::Choice::{Cooperate as C, Defect as D};
    use crate::tally::Tally;

    fn names() -> Vec<String> {
        vec!["A".into(), "B".into(), "C".into()]
    }

    fn sample_round() -> RoundResult {
        RoundResult {
            round: 2,
            combination: [C, D, C],
            scores: [3, 9, 3],
            cumulative: [10, 18, 10],
        }
    }

    fn sample_match() -> MatchResult {
        let mut tally = Tally::new(names().as_slice());
        tally.add(0, 10);
        tally.add(1, 18);
        tally.add(2, 10);
        MatchResult { names: names(), rounds: vec![sample_round()], tally, round_count: 2 }
    }

    fn render<F: FnOnce(&mut Reporter<Vec<u8>>) -> io::Result<()>>(format: Format, f: F) -> String {
        let mut reporter = Reporter::new(Vec::new(), format);
        f(&mut reporter).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_round_text() {
        let out = render(Format::Text, |r| r.round(&names(), &sample_round()));
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "=================== ROUND #2 ==============");
        assert_eq!(lines[1], "    NAMES    |\tA\tB\tC");
        assert_eq!(lines[2], "   CHOICES   |\tC\tD\tC");
        assert_eq!(lines[3], "ROUND SCORES |\t3\t9\t3");
        assert_eq!(lines[4], "TOTAL SCORES |\t10\t18\t10");
    }

    #[test]
    fn test_game_text() {
        let out = render(Format::Text, |r| r.game(&sample_match()));
        assert!(out.contains("STEPS COUNT\t|\t2\n"));
        assert!(out.contains("B\t|\t18\n"));
    }

    #[test]
    fn test_total_text_flags_all_winners() {
        let mut totals = Tally::new(&["w", "x", "y", "z"]);
        totals.add(0, 5);
        totals.add(2, 5);
        totals.add(3, 1);
        let result = TournamentResult { matches: Vec::new(), winners: totals.winners(), totals };

        let out = render(Format::Text, |r| r.total(&result));
        assert_eq!(out.matches("<--- WINNER").count(), 2);
        assert!(out.contains("w\t|\t5\t\t<--- WINNER"));
        assert!(out.contains("y\t|\t5\t\t<--- WINNER"));
        assert!(out.contains("x\t|\t0\n"));
    }

    #[test]
    fn test_json_events() {
        let mut reporter = Reporter::json(Vec::new());
        reporter.round(&names(), &sample_round()).unwrap();
        reporter.game(&sample_match()).unwrap();
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let round: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(round["event"], "round");
        assert_eq!(round["round"]["round"], 2);
        assert_eq!(round["round"]["combination"][1], "Defect");

        let game: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(game["event"], "game");
        assert_eq!(game["result"]["round_count"], 2);
    }

    #[test]
    fn test_disable_printing_midway() {
        let mut reporter = Reporter::text(Vec::new());
        reporter.game(&sample_match()).unwrap();
        assert!(reporter.is_printing());

        reporter.disable_printing();
        reporter.game(&sample_match()).unwrap();
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(out.matches("GAME RESULTS").count(), 1);
    }

    #[test]
    fn test_printing_disabled() {
        let mut reporter = Reporter::text(Vec::new()).with_printing(false);
        reporter.round(&names(), &sample_round()).unwrap();
        reporter.game(&sample_match()).unwrap();
        assert!(!reporter.is_printing());
        assert!(reporter.into_inner().is_empty());
    }
}
