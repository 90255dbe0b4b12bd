// vim: set ai et ts=4 sts=4 sw=4:
//! Readers for the puzzle files the command line tool accepts. They only produce clue
//! lists (and optionally an expected solution); solving is left to `Puzzle` and `Solver`.
use std::fs;
use std::path::Path;
use std::convert::TryFrom;
use yaml_rust::{YamlLoader, Yaml};
use serde::Deserialize;

use super::grid::Error;
use super::puzzle::{Puzzle, derive_clues};

#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleFile {
    pub row_run_lengths: Vec<Vec<usize>>,
    pub col_run_lengths: Vec<Vec<usize>>,
    pub solution: Option<Vec<Vec<bool>>>, // expected solution, if the file carries one
}

impl PuzzleFile {
    /// Reads a puzzle file, picking the format from its extension:
    /// `.yaml`/`.yml`, `.json`, and the column/row clue text format for anything else.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Format(format!("{}: {}", path.display(), e)))?;
        let extension = path.extension()
                            .and_then(|ext| ext.to_str())
                            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            Some("json")               => Self::from_json_str(&contents),
            _                          => Self::from_clue_text(&contents),
        }
    }

    pub fn to_puzzle(&self) -> Result<Puzzle, Error> {
        Puzzle::new(&self.row_run_lengths, &self.col_run_lengths)
    }

    // ------------------------------------------------

    pub fn from_yaml_str(s: &str) -> Result<Self, Error> {
        let docs: Vec<Yaml> = YamlLoader::load_from_str(s)
            .map_err(|e| Error::Format(format!("invalid YAML: {}", e)))?;
        let doc = docs.first()
                      .ok_or_else(|| Error::Format("empty YAML document".to_string()))?;
        Self::from_yaml(doc)
    }

    pub fn from_yaml(doc: &Yaml) -> Result<Self, Error> {
        // note: column runs are listed top to bottom
        let row_run_lengths = Self::_parse_yaml_lines(&doc["rows"], "rows")?;
        let col_run_lengths = Self::_parse_yaml_lines(&doc["cols"], "cols")?;
        let solution = match &doc["solution"] {
            Yaml::BadValue | Yaml::Null => None,
            Yaml::Array(list) => Some(list.iter()
                                          .map(|row| row.as_str()
                                                        .map(parse_solution_row)
                                                        .ok_or_else(|| Error::Format(format!("solution rows must be strings, got {:?}", row))))
                                          .collect::<Result<Vec<_>, _>>()?),
            other => return Err(Error::Format(format!("solution must be a list of strings, got {:?}", other))),
        };
        Self::checked(row_run_lengths, col_run_lengths, solution)
    }

    fn _parse_yaml_lines(input: &Yaml, key: &str) -> Result<Vec<Vec<usize>>, Error> {
        let list: &Vec<Yaml> = input.as_vec()
            .ok_or_else(|| Error::Format(format!("missing or malformed '{}' list", key)))?;
        list.iter()
            .map(|yaml_val| Self::_parse_yaml_runs(yaml_val))
            .collect()
    }

    fn _parse_yaml_runs(input: &Yaml) -> Result<Vec<usize>, Error> {
        match input {
            Yaml::String(s)  => parse_clue_line(s),
            Yaml::Integer(i) => Ok(vec![ yaml_run_length(*i)? ]),
            Yaml::Array(xs)  => xs.iter()
                                  .map(|x| match x {
                                      Yaml::Integer(i) => yaml_run_length(*i),
                                      other => Err(Error::Format(format!("unexpected run length: {:?}", other))),
                                  })
                                  .collect(),
            Yaml::Null       => Ok(vec![]),
            _ => Err(Error::Format(format!("unexpected data type: {:?}", input))),
        }
    }

    // ------------------------------------------------

    /// Parses the clue text format:
    ///
    /// ```text
    /// columns =
    ///     1 1
    ///     3
    /// rows =
    ///     2
    ///     0
    /// ```
    ///
    /// Blank lines, `#` comments and `[section]` headers are skipped.
    pub fn from_clue_text(s: &str) -> Result<Self, Error> {
        enum Section { Preamble, Columns, Rows, Other }

        let mut section = Section::Preamble;
        let mut row_run_lengths = Vec::<Vec<usize>>::new();
        let mut col_run_lengths = Vec::<Vec<usize>>::new();

        for (lineno, line) in s.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            if let Some(eq) = line.find('=') {
                section = match line[..eq].trim().to_ascii_lowercase().as_str() {
                    "columns" | "cols" => Section::Columns,
                    "rows"             => Section::Rows,
                    _                  => Section::Other,
                };
                continue;
            }
            let runs = parse_clue_line(line)
                .map_err(|e| Error::Format(format!("line {}: {}", lineno+1, e)))?;
            match section {
                Section::Columns  => col_run_lengths.push(runs),
                Section::Rows     => row_run_lengths.push(runs),
                Section::Other    => {},
                Section::Preamble => return Err(Error::Format(
                    format!("line {}: clue found before any 'columns =' or 'rows =' header", lineno+1))),
            }
        }
        if row_run_lengths.is_empty() && col_run_lengths.is_empty() {
            return Err(Error::Format("no clues found".to_string()));
        }
        Self::checked(row_run_lengths, col_run_lengths, None)
    }

    // ------------------------------------------------

    /// Parses `{"size": [height, width], "rowHints": [...], "colHints": [...], "solution": [...]}`.
    /// Hints may be left out when a solution is given; they are derived from it.
    pub fn from_json_str(s: &str) -> Result<Self, Error> {
        let json: JsonPuzzle = serde_json::from_str(s)
            .map_err(|e| Error::Format(format!("invalid JSON puzzle: {}", e)))?;
        let solution = json.solution.map(|rows| rows.iter()
                                                    .map(|row| parse_solution_row(row))
                                                    .collect::<Vec<_>>());

        let (row_run_lengths, col_run_lengths) = match (json.row_hints, json.col_hints, &solution) {
            (Some(rows), Some(cols), _) => (rows, cols),
            (None, None, Some(solution)) => derive_clues(solution),
            _ => return Err(Error::Format("JSON puzzle needs both rowHints and colHints, or a solution".to_string())),
        };

        if let Some(size) = json.size {
            if size != [row_run_lengths.len(), col_run_lengths.len()] {
                return Err(Error::Format(format!(
                    "size {:?} does not match {} row hints and {} column hints",
                    size, row_run_lengths.len(), col_run_lengths.len())));
            }
        }
        Self::checked(row_run_lengths, col_run_lengths, solution)
    }

    fn checked(row_run_lengths: Vec<Vec<usize>>,
               col_run_lengths: Vec<Vec<usize>>,
               solution: Option<Vec<Vec<bool>>>) -> Result<Self, Error>
    {
        if let Some(rows) = &solution {
            let width = col_run_lengths.len();
            if rows.len() != row_run_lengths.len() || rows.iter().any(|row| row.len() != width) {
                return Err(Error::Format(format!(
                    "solution must be {} rows of {} squares", row_run_lengths.len(), width)));
            }
        }
        Ok(PuzzleFile { row_run_lengths, col_run_lengths, solution })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonPuzzle {
    size: Option<[usize; 2]>,
    row_hints: Option<Vec<Vec<usize>>>,
    col_hints: Option<Vec<Vec<usize>>>,
    solution: Option<Vec<String>>,
}

/// Parses one line's runs, separated by whitespace or commas. `0` alone means an empty line.
pub fn parse_clue_line(s: &str) -> Result<Vec<usize>, Error> {
    s.split(|c: char| c.is_whitespace() || c == ',')
     .filter(|part| !part.is_empty())
     .map(|part| part.parse::<usize>()
                     .map_err(|_| Error::Format(format!("not a run length: '{}'", part))))
     .collect()
}

/// Filled squares are written as `#`, `1`, `O` or `■`; anything else is empty.
pub fn parse_solution_row(s: &str) -> Vec<bool> {
    s.chars()
     .map(|c| matches!(c, '#' | '1' | 'O' | 'o' | '\u{25A0}'))
     .collect()
}

fn yaml_run_length(value: i64) -> Result<usize, Error> {
    usize::try_from(value).map_err(|_| Error::Format(format!("negative run length: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_accepts_strings_integers_and_nulls() {
        let file = PuzzleFile::from_yaml_str("
rows:
    - 5
    - 1 4
    -
    - [2, 1]
cols:
    - 8
    - '1 1'
").unwrap();
        assert_eq!(file.row_run_lengths, vec![vec![5], vec![1, 4], vec![], vec![2, 1]]);
        assert_eq!(file.col_run_lengths, vec![vec![8], vec![1, 1]]);
        assert_eq!(file.solution, None);
    }

    #[test]
    fn yaml_solution_must_match_the_clues() {
        let ok = PuzzleFile::from_yaml_str("rows: [1, 0]\ncols: [1, 0]\nsolution: ['#.', '..']\n").unwrap();
        assert_eq!(ok.solution, Some(vec![vec![true, false], vec![false, false]]));
        assert!(PuzzleFile::from_yaml_str("rows: [1]\ncols: [1]\nsolution: ['#.']\n").is_err());
    }

    #[test]
    fn yaml_without_rows_is_rejected() {
        assert!(matches!(PuzzleFile::from_yaml_str("cols: [1]\n"), Err(Error::Format(_))));
        assert!(PuzzleFile::from_yaml_str("rows: [-1]\ncols: [1]\n").is_err());
    }

    #[test]
    fn clue_text_has_column_and_row_sections() {
        let file = PuzzleFile::from_clue_text("\
# a tiny puzzle
[clues]
columns =
    1 1
    3

rows =
    2
    0
    1,1
").unwrap();
        assert_eq!(file.col_run_lengths, vec![vec![1, 1], vec![3]]);
        assert_eq!(file.row_run_lengths, vec![vec![2], vec![0], vec![1, 1]]);
    }

    #[test]
    fn clue_text_rejects_garbage() {
        assert!(PuzzleFile::from_clue_text("1 2\nrows =\n1\n").is_err());
        assert!(PuzzleFile::from_clue_text("rows =\n1 x\n").is_err());
        assert!(PuzzleFile::from_clue_text("# nothing here\n").is_err());
    }

    #[test]
    fn json_hints_can_be_derived_from_the_solution() {
        let file = PuzzleFile::from_json_str(r###"{"size": [2, 3], "solution": ["##.", "..#"]}"###).unwrap();
        assert_eq!(file.row_run_lengths, vec![vec![2], vec![1]]);
        assert_eq!(file.col_run_lengths, vec![vec![1], vec![1], vec![1]]);

        let file = PuzzleFile::from_json_str(r#"{"rowHints": [[1]], "colHints": [[1]]}"#).unwrap();
        assert_eq!(file.solution, None);
    }

    #[test]
    fn json_size_must_agree_with_hints() {
        let err = PuzzleFile::from_json_str(r#"{"size": [3, 3], "rowHints": [[1]], "colHints": [[1]]}"#);
        assert!(matches!(err, Err(Error::Format(_))));
        assert!(PuzzleFile::from_json_str(r#"{"rowHints": [[1]]}"#).is_err());
    }

    #[test]
    fn solution_rows_accept_several_fill_markers() {
        assert_eq!(parse_solution_row("#1O.x \u{25A0}"), vec![true, true, true, false, false, false, true]);
    }
}
