use crate::chart::Chart;
use crate::error::HousingError;
use crate::utils::*;
use chrono::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
pub mod chart;
pub mod credentials;
pub mod error;
pub mod plot_zip_code;
pub mod query;
pub mod utils;

// constants
pub const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");
pub const DRIVER_SCHEME: &str = "mysql+pymysql";
pub const PORT: u16 = 3306;
pub const DATABASE: &str = "housing";
pub const PROCEDURE: &str = "proc_view_zip_code";
pub const PERIOD_END: &str = "PeriodEnd";
pub const DEFAULT_METRIC: &str = "median_sale_price";
pub const DEFAULT_ZIP_CODES: [&str; 1] = ["98052"];
pub const CREDENTIALS_FILE: &str = "data/config/mariadb.json";

/// Default credentials file, under data/config one level above the directory of the program.
pub fn default_credentials_path<P>(program: P) -> PathBuf
where
    P: AsRef<Path>,
{
    let dir = program.as_ref().parent().unwrap_or_else(|| Path::new("."));
    dir.join("..").join(CREDENTIALS_FILE)
}

/// The housing types reported by the stored procedure, one column each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HousingType {
    AllTypes,
    Condo,
    SingleFamily,
    Townhouse,
}

impl HousingType {
    /// All the housing types, in plotting order.
    pub const ALL: [HousingType; 4] = [
        HousingType::AllTypes,
        HousingType::Condo,
        HousingType::SingleFamily,
        HousingType::Townhouse,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            HousingType::AllTypes => "AllTypes",
            HousingType::Condo => "Condo",
            HousingType::SingleFamily => "SingleFamily",
            HousingType::Townhouse => "Townhouse",
        }
    }
}

/// The main struct for the housing time series of one zip code and metric.
#[derive(Debug, Clone, PartialEq)]
pub struct HousingTable {
    pub period_end: Vec<NaiveDate>,
    pub all_types: Vec<f64>,
    pub condo: Vec<f64>,
    pub single_family: Vec<f64>,
    pub townhouse: Vec<f64>,
}

impl HousingTable {
    /// Initiate a new HousingTable instance
    /// using the given capacity for the date and value vectors
    pub fn new(capacity: usize) -> HousingTable {
        HousingTable {
            period_end: Vec::with_capacity(capacity),
            all_types: Vec::with_capacity(capacity),
            condo: Vec::with_capacity(capacity),
            single_family: Vec::with_capacity(capacity),
            townhouse: Vec::with_capacity(capacity),
        }
    }

    /// Append one row, values ordered as HousingType::ALL.
    pub fn push(&mut self, period_end: NaiveDate, values: [f64; 4]) {
        let [all_types, condo, single_family, townhouse] = values;
        self.period_end.push(period_end);
        self.all_types.push(all_types);
        self.condo.push(condo);
        self.single_family.push(single_family);
        self.townhouse.push(townhouse);
    }

    pub fn len(&self) -> usize {
        self.period_end.len()
    }

    pub fn is_empty(&self) -> bool {
        self.period_end.is_empty()
    }

    pub fn column(&self, housing_type: HousingType) -> &[f64] {
        match housing_type {
            HousingType::AllTypes => &self.all_types,
            HousingType::Condo => &self.condo,
            HousingType::SingleFamily => &self.single_family,
            HousingType::Townhouse => &self.townhouse,
        }
    }

    /// Build the chart of all housing types with their linear trends.
    /// Each column is plotted as a solid line, followed by its least squares trend
    /// as a dashed line of the same color, evaluated at the same dates.
    /// The title is "zip_code: metric_name" and the y axis starts from 0.
    /// Fail when a column has less than two usable dates for the trend.
    pub fn chart(&self, metric_name: &str, zip_code: &str) -> Result<Chart, HousingError> {
        let ordinals: Vec<f64> = self.period_end.iter().map(date_to_num).collect();
        let mut chart = Chart::new(&format!("{}: {}", zip_code, metric_name));
        for housing_type in HousingType::ALL {
            let name = housing_type.column_name();
            let values = self.column(housing_type);
            let color = chart.line(name, self.period_end.clone(), values.to_vec());
            let fit = linear_fit(&ordinals, values).map_err(|source| HousingError::TrendFit {
                column: name.to_string(),
                source,
            })?;
            let trend: Vec<f64> = ordinals.iter().map(|x| fit.at(*x)).collect();
            chart.dashed_line(
                &format!("{} trend", name),
                self.period_end.clone(),
                trend,
                color,
            );
        }
        chart.y_min(0.);
        Ok(chart)
    }
}

impl fmt::Display for HousingTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", PERIOD_END)?;
        for housing_type in HousingType::ALL {
            write!(f, ",{}", housing_type.column_name())?;
        }
        writeln!(f)?;
        // rows stop at the shortest column
        let rows = self
            .period_end
            .iter()
            .zip(self.all_types.iter())
            .zip(self.condo.iter())
            .zip(self.single_family.iter())
            .zip(self.townhouse.iter());
        for ((((d, a), c), s), t) in rows {
            writeln!(f, "{},{},{},{},{}", d.format("%Y-%m-%d"), a, c, s, t)?;
        }
        Ok(())
    }
}
