// vim: set ai et ts=4 sw=4 sts=4:
use std::fmt;
use std::convert::TryFrom;
use ansi_term::ANSIString;

use super::Puzzle;
use super::super::grid::SquareStatus;
use super::super::util::{ralign, lalign_colored, ralign_joined_coloreds};

/// How a puzzle is drawn to the terminal.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Style {
    Grid,    // boxed grid with clues along the top and left
    Emoji,
    Plain,
}
impl TryFrom<&str> for Style {
    type Error = String;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "grid"  => Ok(Style::Grid),
            "emoji" => Ok(Style::Emoji),
            "plain" => Ok(Style::Plain),
            _       => Err(format!("Not a valid style: {}", value)),
        }
    }
}

impl Puzzle {
    pub fn render(&self, style: Style, emit_color: bool) -> String {
        match style {
            Style::Grid  => self._fmt(Some(5), emit_color),
            Style::Emoji => self._fmt_cells(|s| s.to_emoji().to_string()),
            Style::Plain => self._fmt_cells(|s| s.to_plain().to_string()),
        }
    }

    fn _fmt_cells<F>(&self, cell: F) -> String
        where F: Fn(&SquareStatus) -> String
    {
        let mut result = String::new();
        for y in 0..self.height() {
            for status in self.grid.row_statuses(y).iter() {
                result.push_str(&cell(status));
            }
            result.push('\n');
        }
        result
    }

    // helper functions for Puzzle::fmt
    fn _fmt(&self, subdivision: Option<usize>, emit_color: bool)
        -> String
    {
        // if subdivision is given, insert visual subdivisor lines across the grid every Nth row/col
        let row_prefixes: Vec<Vec<ANSIString>> =
            self.rows.iter()
                     .map(|row| row.runs.iter()
                                        .map(|run| run.to_colored_string())
                                        .collect::<Vec<_>>())
                     .collect();

        let prefix_len = row_prefixes.iter()
                                     .map(|parts| parts.iter()
                                                       .fold(0usize, |sum, ansi_str| sum + ansi_str.len() + 1) // note: .len() returns length WITHOUT ansi color escape sequences
                                                       .saturating_sub(1)) // minus one at the end to match the length of a join(" ")
                                     .max().unwrap_or(0);
        let max_col_runs = self.cols.iter()
                                    .map(|col| col.runs.len())
                                    .max().unwrap_or(0);

        let mut result = String::new();

        for i in (0..max_col_runs).rev() {
            result.push_str(&self._fmt_header(i, prefix_len, subdivision, emit_color));
        }

        let border = (0..self.width()).map(|_| String::from("\u{2550}\u{2550}\u{2550}"))
                                      .collect::<Vec<_>>();
        // top board line
        result.push_str(&Self::_fmt_line(
            &ralign("", prefix_len),
            "\u{2554}",
            "\u{2557}",
            "\u{2564}",
            subdivision,
            &border
        ));

        for y in 0..self.height() {
            // board content line
            result.push_str(&Self::_fmt_line(
                &ralign_joined_coloreds(&row_prefixes[y], prefix_len, emit_color),
                "\u{2551}",
                "\u{2551}",
                "\u{2502}",
                subdivision,
                &(0..self.width()).map(|x| format!(" {:1} ", self.get_square(x, y)))
                                  .collect::<Vec<_>>()
            ));

            // horizontal subdivisor line
            if let Some(subdiv) = subdivision {
                if ((y+1) % subdiv == 0) && (y != self.height()-1) {
                    result.push_str(&Self::_fmt_line(
                        &ralign("", prefix_len),
                        "\u{255F}",
                        "\u{2562}",
                        "\u{253C}",
                        subdivision,
                        &(0..self.width()).map(|_| String::from("\u{2500}\u{2500}\u{2500}"))
                                          .collect::<Vec<_>>()
                    ));
                }
            }
        }
        // bottom board line
        result.push_str(&Self::_fmt_line(
            &ralign("", prefix_len),
            "\u{255A}",
            "\u{255D}",
            "\u{2567}",
            subdivision,
            &border
        ));

        result
    }

    fn _fmt_line(prefix: &str,
                 left_delim: &str,
                 right_delim: &str,
                 columnwise_separator: &str,
                 subdivision: Option<usize>,
                 content_parts: &[String])
        -> String
    {
        let mut result = format!("{} {}", prefix, left_delim);
        for (idx, s) in content_parts.iter().enumerate() {
            result.push_str(s);
            if let Some(subdiv) = subdivision {
                if ((idx+1) % subdiv == 0) && (idx < content_parts.len()-1) {
                    result.push_str(columnwise_separator);
                }
            }
        }
        result.push_str(right_delim);
        result.push('\n');
        result
    }

    fn _fmt_header(&self, line_idx: usize,
                          prefix_len: usize,
                          subdivision: Option<usize>,
                          emit_color: bool)
        -> String
    {
        let content_parts = self.cols.iter()
            .map(|col| {
                if line_idx < col.runs.len() {
                    let colored = col.runs[col.runs.len()-1-line_idx].to_colored_string();
                    format!(" {}", lalign_colored(&colored, 2, emit_color))
                } else {
                    format!(" {:-2}", " ")
                }
            })
            .collect::<Vec<_>>();

        Self::_fmt_line(
            &ralign("", prefix_len),
            " ",
            " ",
            " ",
            subdivision,
            &content_parts
        )
    }
}
impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render(Style::Grid, false))
    }
}
