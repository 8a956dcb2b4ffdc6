//! Data vintages: the `historical`, `recent` and `now` sub-folders of a product.

use std::fmt;

/// Age class of a product sub-folder.
///
/// The declaration order is the merge precedence: on overlapping timestamps an earlier
/// vintage wins, so `Ord` on this type sorts by precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Vintage {
    /// Quality-controlled archives, roughly 500 days up to 40 years old.
    Historical,
    /// The last ~500 days, updated daily.
    Recent,
    /// The current day.
    Now,
}

impl Vintage {
    /// All vintages in precedence order.
    pub const ALL: [Vintage; 3] = [Vintage::Historical, Vintage::Recent, Vintage::Now];

    pub fn folder_name(&self) -> &'static str {
        match self {
            Vintage::Historical => "historical",
            Vintage::Recent => "recent",
            Vintage::Now => "now",
        }
    }

    /// Maps a listed sub-folder to a vintage. `meta_data` and unknown names yield `None`.
    pub fn from_folder(name: &str) -> Option<Vintage> {
        let name = name.trim().trim_end_matches('/');
        Vintage::ALL
            .into_iter()
            .find(|vintage| vintage.folder_name() == name)
    }

    /// Youngest data the folder holds, in days before now.
    pub fn min_days_old(&self) -> i64 {
        match self {
            Vintage::Historical => 500,
            Vintage::Recent => 1,
            Vintage::Now => 0,
        }
    }

    /// Oldest data the folder holds, in days before now.
    pub fn max_days_old(&self) -> i64 {
        match self {
            Vintage::Historical => 14600,
            Vintage::Recent => 500,
            Vintage::Now => 1,
        }
    }
}

impl fmt::Display for Vintage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.folder_name())
    }
}
