//! Lookup tables that turn the dataset's integer codes into display labels.

use std::fmt;

use serde::Serialize;

use crate::error::MappingError;

/// A closed code → label domain for one categorical column.
#[derive(Debug, Clone, Copy)]
pub struct CategoryTable {
    pub category: &'static str,
    pub entries: &'static [(i64, &'static str)],
}

pub const SEASONS: CategoryTable = CategoryTable {
    category: "season",
    entries: &[(1, "Spring"), (2, "Summer"), (3, "Fall"), (4, "Winter")],
};

pub const WEEKDAYS: CategoryTable = CategoryTable {
    category: "weekday",
    entries: &[
        (0, "Sunday"),
        (1, "Monday"),
        (2, "Tuesday"),
        (3, "Wednesday"),
        (4, "Thursday"),
        (5, "Friday"),
        (6, "Saturday"),
    ],
};

pub const MONTHS: CategoryTable = CategoryTable {
    category: "month",
    entries: &[
        (1, "January"),
        (2, "February"),
        (3, "March"),
        (4, "April"),
        (5, "May"),
        (6, "June"),
        (7, "July"),
        (8, "August"),
        (9, "September"),
        (10, "October"),
        (11, "November"),
        (12, "December"),
    ],
};

pub fn map_code(table: &CategoryTable, code: i64) -> Result<&'static str, MappingError> {
    table
        .entries
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, label)| *label)
        .ok_or(MappingError::Unmapped {
            category: table.category,
            code,
        })
}

fn position(table: &CategoryTable, code: i64) -> Result<usize, MappingError> {
    table
        .entries
        .iter()
        .position(|(candidate, _)| *candidate == code)
        .ok_or(MappingError::Unmapped {
            category: table.category,
            code,
        })
}

macro_rules! coded_enum {
    ($name:ident, $table:expr, [$($variant:ident),+ $(,)?]) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn code(self) -> i64 {
                $table.entries[self as usize].0
            }

            /// Always mapped, since variants are declared in table order.
            pub fn label(self) -> &'static str {
                map_code(&$table, self.code()).unwrap_or_default()
            }
        }

        impl TryFrom<i64> for $name {
            type Error = MappingError;

            fn try_from(code: i64) -> Result<Self, Self::Error> {
                position(&$table, code).map(|index| Self::ALL[index])
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

coded_enum!(Season, SEASONS, [Spring, Summer, Fall, Winter]);
coded_enum!(
    Weekday,
    WEEKDAYS,
    [Sunday, Monday, Tuesday, Wednesday, Thursday, Friday, Saturday]
);
coded_enum!(
    Month,
    MONTHS,
    [
        January, February, March, April, May, June, July, August, September, October, November,
        December,
    ]
);

/// The `yr` column: 0 is the first year of the dataset, 1 the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum YearIndicator {
    First,
    Second,
}

impl YearIndicator {
    pub fn calendar_year(self) -> i32 {
        match self {
            YearIndicator::First => 2011,
            YearIndicator::Second => 2012,
        }
    }
}

impl TryFrom<i64> for YearIndicator {
    type Error = MappingError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(YearIndicator::First),
            1 => Ok(YearIndicator::Second),
            _ => Err(MappingError::Unmapped {
                category: "yr",
                code,
            }),
        }
    }
}
