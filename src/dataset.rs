use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::category::{Month, Season, Weekday, YearIndicator};
use crate::error::{LoadError, MappingError};
use crate::models::RentalRecord;

pub const REQUIRED_COLUMNS: [&str; 9] = [
    "instant",
    "dteday",
    "season",
    "yr",
    "mnth",
    "holiday",
    "weekday",
    "workingday",
    "cnt",
];

/// The loaded rental days, sorted ascending by date. Never modified after load.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<RentalRecord>,
}

impl Dataset {
    pub fn from_records(mut records: Vec<RentalRecord>) -> Self {
        // sort_by_key is stable, so same-day rows keep file order
        records.sort_by_key(|record| record.date);
        Dataset { records }
    }

    pub fn records(&self) -> &[RentalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some((first.date, last.date))
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    instant: String,
    dteday: String,
    season: String,
    yr: String,
    mnth: String,
    holiday: String,
    weekday: String,
    workingday: String,
    cnt: String,
}

pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_dataset(file)?;
    debug!(path = %path.display(), rows = dataset.len(), "dataset loaded");
    Ok(dataset)
}

pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(LoadError::MissingColumn(column));
        }
    }

    let mut records = Vec::new();
    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result?;
        records.push(parse_row(index + 1, row)?);
    }

    let dataset = Dataset::from_records(records);
    let duplicates = dataset
        .records()
        .windows(2)
        .filter(|pair| pair[0].date == pair[1].date)
        .count();
    if duplicates > 0 {
        warn!(duplicates, "dataset contains repeated dates");
    }

    Ok(dataset)
}

fn parse_row(row: usize, raw: CsvRow) -> Result<RentalRecord, LoadError> {
    Ok(RentalRecord {
        instant: parse_int(row, "instant", &raw.instant)?,
        date: parse_date(&raw.dteday).ok_or_else(|| LoadError::Parse {
            row,
            column: "dteday",
            message: format!("'{}' is not a calendar date", raw.dteday),
        })?,
        season: parse_code::<Season>(row, "season", &raw.season)?,
        year: parse_code::<YearIndicator>(row, "yr", &raw.yr)?,
        month: parse_code::<Month>(row, "mnth", &raw.mnth)?,
        holiday: parse_flag(row, "holiday", &raw.holiday)?,
        weekday: parse_code::<Weekday>(row, "weekday", &raw.weekday)?,
        working_day: parse_flag(row, "workingday", &raw.workingday)?,
        count: raw.cnt.parse().map_err(|_| LoadError::Parse {
            row,
            column: "cnt",
            message: format!("'{}' is not a non-negative integer", raw.cnt),
        })?,
    })
}

/// Accepts plain dates as well as timestamps, dropping the time of day.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|timestamp| timestamp.date())
}

fn parse_int(row: usize, column: &'static str, value: &str) -> Result<i64, LoadError> {
    value.parse().map_err(|_| LoadError::Parse {
        row,
        column,
        message: format!("'{value}' is not an integer"),
    })
}

fn parse_code<T>(row: usize, column: &'static str, value: &str) -> Result<T, LoadError>
where
    T: TryFrom<i64, Error = MappingError>,
{
    let code = parse_int(row, column, value)?;
    T::try_from(code).map_err(|err| LoadError::Parse {
        row,
        column,
        message: err.to_string(),
    })
}

fn parse_flag(row: usize, column: &'static str, value: &str) -> Result<bool, LoadError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(LoadError::Parse {
            row,
            column,
            message: format!("'{value}' is not a 0/1 flag"),
        }),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "instant,dteday,season,yr,mnth,holiday,weekday,workingday,cnt";

    pub(crate) fn record(instant: i64, date: &str, season: i64, count: u64) -> RentalRecord {
        let date = parse_date(date).unwrap();
        RentalRecord {
            instant,
            date,
            season: Season::try_from(season).unwrap(),
            year: YearIndicator::First,
            month: Month::January,
            holiday: false,
            weekday: Weekday::Monday,
            working_day: true,
            count,
        }
    }

    fn read(body: &str) -> Result<Dataset, LoadError> {
        read_dataset(format!("{HEADER}\n{body}").as_bytes())
    }

    #[test]
    fn loads_and_sorts_by_date() {
        let dataset = read(
            "3,2011-06-01,2,0,6,0,3,1,5\n\
             1,2011-01-01,1,0,1,0,6,0,10\n\
             2,2011-01-02,1,0,1,0,0,0,20\n",
        )
        .unwrap();

        let instants: Vec<i64> = dataset.records().iter().map(|r| r.instant).collect();
        assert_eq!(instants, vec![1, 2, 3]);

        let first = &dataset.records()[0];
        assert_eq!(first.season, Season::Spring);
        assert_eq!(first.weekday, Weekday::Saturday);
        assert!(!first.working_day);
        assert_eq!(first.count, 10);

        let (min, max) = dataset.date_bounds().unwrap();
        assert_eq!(min, NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        assert_eq!(max, NaiveDate::from_ymd_opt(2011, 6, 1).unwrap());
    }

    #[test]
    fn same_day_rows_keep_file_order() {
        let dataset = read(
            "7,2011-01-02,1,0,1,0,0,0,1\n\
             5,2011-01-01,1,0,1,0,6,0,1\n\
             4,2011-01-02,1,0,1,0,0,0,1\n",
        )
        .unwrap();

        let instants: Vec<i64> = dataset.records().iter().map(|r| r.instant).collect();
        assert_eq!(instants, vec![5, 7, 4]);
    }

    #[test]
    fn ignores_extra_columns_and_accepts_timestamps() {
        let csv = "instant,dteday,season,yr,mnth,holiday,weekday,workingday,temp,cnt\n\
                   1,2012-03-04 00:00:00,1,1,3,false,0,true,0.3,42\n";
        let dataset = read_dataset(csv.as_bytes()).unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2012, 3, 4).unwrap());
        assert_eq!(record.year.calendar_year(), 2012);
        assert_eq!(record.month, Month::March);
        assert!(record.working_day);
        assert_eq!(record.count, 42);
    }

    #[test]
    fn missing_column_fails_the_load() {
        let csv = "instant,dteday,season,yr,mnth,holiday,weekday,workingday\n\
                   1,2011-01-01,1,0,1,0,6,0\n";
        let err = read_dataset(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("cnt")));
    }

    #[test]
    fn malformed_date_fails_the_load() {
        let err = read("1,2011-01-01,1,0,1,0,6,0,10\n2,not-a-date,1,0,1,0,0,0,20\n").unwrap_err();
        match err {
            LoadError::Parse { row, column, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "dteday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn out_of_domain_season_fails_the_load() {
        let err = read("1,2011-01-01,5,0,1,0,6,0,10\n").unwrap_err();
        match err {
            LoadError::Parse { column, message, .. } => {
                assert_eq!(column, "season");
                assert!(message.contains("season code 5"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_code_fails_the_load() {
        let err = read("1,2011-01-01,1,0,1,0,Monday,0,10\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse { column: "weekday", .. }));
    }

    #[test]
    fn loads_from_file_and_reports_missing_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "1,2011-01-01,1,0,1,0,6,0,985").unwrap();

        let dataset = load_dataset(file.path()).unwrap();
        assert_eq!(dataset.len(), 1);

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            load_dataset(&missing),
            Err(LoadError::Io { .. })
        ));
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let dataset = read("").unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.date_bounds().is_none());
    }
}
