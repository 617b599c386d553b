//! The prepared, column-oriented event table
//!
//! A [`PreparedTable`] wraps a single Arrow [`RecordBatch`] holding the raw
//! columns followed by the derived ones, plus the ordered category set of
//! every categorical column. The table is never mutated after construction;
//! filters and extra columns produce new tables.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use arrow::array::{
    Array, ArrayRef, BooleanArray, Date32Array, Float64Array, Int32Array, StringArray,
    UInt64Array,
};
use arrow::datatypes::{DataType, Date32Type, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};
use crate::filter::{Expr, evaluate_expr, filter_record_batch};
use crate::models::columns;
use crate::models::{DevelopmentStatus, PreparedEvent, RawEvent};
use crate::utils::arrow::{column_as_f64, downcast_array, get_column_index};

static PREPARED_SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    Arc::new(Schema::new(vec![
        Field::new(columns::EVENT_ID, DataType::Utf8, false),
        Field::new(columns::DATE, DataType::Date32, false),
        Field::new(columns::YEAR, DataType::Int32, false),
        Field::new(columns::COUNTRY, DataType::Utf8, false),
        Field::new(columns::EVENT_TYPE, DataType::Utf8, false),
        Field::new(columns::LATITUDE, DataType::Float64, false),
        Field::new(columns::LONGITUDE, DataType::Float64, false),
        Field::new(columns::AFFECTED_POPULATION, DataType::UInt64, false),
        Field::new(columns::DEATHS, DataType::UInt64, false),
        Field::new(columns::INJURIES, DataType::UInt64, false),
        Field::new(columns::DURATION_DAYS, DataType::Float64, false),
        Field::new(columns::INFRASTRUCTURE_DAMAGE_SCORE, DataType::Float64, false),
        Field::new(columns::ECONOMIC_IMPACT, DataType::Float64, false),
        Field::new(columns::INTERNATIONAL_AID, DataType::Float64, false),
        Field::new(columns::RESPONSE_TIME_HOURS, DataType::Float64, false),
        Field::new(columns::DEATH_RATE, DataType::Float64, false),
        Field::new(columns::INJURY_RATE, DataType::Float64, false),
        Field::new(columns::STATUS, DataType::Utf8, false),
        Field::new(columns::RESPONSE_BIN, DataType::Utf8, true),
        Field::new(columns::SCALE, DataType::Utf8, true),
    ]))
});

/// Schema of a freshly prepared table
#[must_use]
pub fn prepared_schema() -> SchemaRef {
    Arc::clone(&PREPARED_SCHEMA)
}

/// Augmented event table handed to the presentation layer
#[derive(Debug, Clone)]
pub struct PreparedTable {
    batch: RecordBatch,
    categories: BTreeMap<String, Vec<String>>,
}

impl PreparedTable {
    /// Build the table from prepared rows
    ///
    /// `categories` maps each categorical column to its full, ordered label set.
    pub fn from_events(
        events: &[PreparedEvent],
        categories: BTreeMap<String, Vec<String>>,
    ) -> Result<Self> {
        let raw = |f: fn(&RawEvent) -> f64| -> ArrayRef {
            Arc::new(Float64Array::from_iter_values(
                events.iter().map(|e| f(&e.event)),
            ))
        };
        let count = |f: fn(&RawEvent) -> u64| -> ArrayRef {
            Arc::new(UInt64Array::from_iter_values(
                events.iter().map(|e| f(&e.event)),
            ))
        };
        let text = |f: fn(&RawEvent) -> &str| -> ArrayRef {
            Arc::new(StringArray::from_iter_values(
                events.iter().map(|e| f(&e.event)),
            ))
        };

        let arrays: Vec<ArrayRef> = vec![
            text(|e| e.event_id.as_str()),
            Arc::new(Date32Array::from_iter_values(
                events
                    .iter()
                    .map(|e| Date32Type::from_naive_date(e.event.date)),
            )),
            Arc::new(Int32Array::from_iter_values(
                events.iter().map(|e| e.event.year),
            )),
            text(|e| e.country.as_str()),
            text(|e| e.event_type.as_str()),
            raw(|e| e.latitude),
            raw(|e| e.longitude),
            count(|e| e.affected_population),
            count(|e| e.deaths),
            count(|e| e.injuries),
            raw(|e| e.duration_days),
            raw(|e| e.infrastructure_damage_score),
            raw(|e| e.economic_impact_million_usd),
            raw(|e| e.international_aid_million_usd),
            raw(|e| e.response_time_hours),
            Arc::new(Float64Array::from_iter_values(
                events.iter().map(|e| e.death_rate),
            )),
            Arc::new(Float64Array::from_iter_values(
                events.iter().map(|e| e.injury_rate),
            )),
            Arc::new(StringArray::from_iter_values(
                events.iter().map(|e| e.status.as_str()),
            )),
            Arc::new(StringArray::from_iter(
                events.iter().map(|e| e.response_bin.as_deref()),
            )),
            Arc::new(StringArray::from_iter(
                events.iter().map(|e| e.scale.as_deref()),
            )),
        ];

        let batch = RecordBatch::try_new(prepared_schema(), arrays)?;
        Ok(Self { batch, categories })
    }

    /// Underlying Arrow batch
    #[must_use]
    pub const fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Schema of the underlying batch
    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    /// Full, ordered category set of a categorical column
    #[must_use]
    pub fn categories(&self, column: &str) -> Option<&[String]> {
        self.categories.get(column).map(Vec::as_slice)
    }

    /// A string column
    pub fn string_column(&self, column: &str) -> Result<&StringArray> {
        let idx = get_column_index(&self.batch, column)?;
        downcast_array::<StringArray>(self.batch.column(idx), column, "String")
    }

    /// An unsigned count column, such as `deaths`
    pub fn count_column(&self, column: &str) -> Result<&UInt64Array> {
        let idx = get_column_index(&self.batch, column)?;
        downcast_array::<UInt64Array>(self.batch.column(idx), column, "UInt64")
    }

    /// A numeric column as `f64`, nulls as NaN
    pub fn numeric_values(&self, column: &str) -> Result<Vec<f64>> {
        column_as_f64(&self.batch, column)
    }

    /// Keep the rows where `mask` is true
    pub fn filter_by_mask(&self, mask: &BooleanArray) -> Result<Self> {
        Ok(Self {
            batch: filter_record_batch(&self.batch, mask)?,
            categories: self.categories.clone(),
        })
    }

    /// Keep the rows matching `expr`
    ///
    /// Category sets are carried over unchanged, so grouping the result still
    /// reports categories that no longer have rows.
    pub fn filter(&self, expr: &Expr) -> Result<Self> {
        let mask = evaluate_expr(&self.batch, expr)?;
        let filtered = self.filter_by_mask(&mask)?;
        log::debug!(
            "Filter kept {} of {} rows",
            filtered.num_rows(),
            self.num_rows()
        );
        Ok(filtered)
    }

    /// Append a two-category column marking membership of `source` in `members`
    ///
    /// Rows whose `source` value is in `members` get `inside`, all others get
    /// `outside`; e.g. `China + India` versus `Rest of world`.
    pub fn with_membership_column(
        &self,
        name: &str,
        source: &str,
        members: &[&str],
        inside: &str,
        outside: &str,
    ) -> Result<Self> {
        if self.batch.schema().index_of(name).is_ok() {
            return Err(Error::config(format!("column '{name}' already exists")));
        }
        if inside == outside {
            return Err(Error::config("membership labels must differ"));
        }

        let values = self.string_column(source)?;
        let labels: StringArray = values
            .iter()
            .map(|value| match value {
                Some(v) if members.contains(&v) => Some(inside),
                Some(_) => Some(outside),
                None => None,
            })
            .collect();

        let mut fields: Vec<Field> = self
            .batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.as_ref().clone())
            .collect();
        fields.push(Field::new(name, DataType::Utf8, true));

        let mut arrays = self.batch.columns().to_vec();
        arrays.push(Arc::new(labels));

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        let mut categories = self.categories.clone();
        categories.insert(
            name.to_string(),
            vec![inside.to_string(), outside.to_string()],
        );

        Ok(Self { batch, categories })
    }

    /// Materialise every row as a [`PreparedEvent`]
    pub fn records(&self) -> Result<Vec<PreparedEvent>> {
        let text = |name: &str| self.string_column(name);
        let event_id = text(columns::EVENT_ID)?;
        let country = text(columns::COUNTRY)?;
        let event_type = text(columns::EVENT_TYPE)?;
        let status = text(columns::STATUS)?;
        let response_bin = text(columns::RESPONSE_BIN)?;
        let scale = text(columns::SCALE)?;

        let date_column = self
            .batch
            .column(get_column_index(&self.batch, columns::DATE)?);
        let date = downcast_array::<Date32Array>(date_column, columns::DATE, "Date32")?;
        let year_column = self
            .batch
            .column(get_column_index(&self.batch, columns::YEAR)?);
        let year = downcast_array::<Int32Array>(year_column, columns::YEAR, "Int32")?;

        let counts = |name: &str| -> Result<Vec<u64>> {
            Ok(self.count_column(name)?.values().to_vec())
        };
        let affected_population = counts(columns::AFFECTED_POPULATION)?;
        let deaths = counts(columns::DEATHS)?;
        let injuries = counts(columns::INJURIES)?;

        let latitude = self.numeric_values(columns::LATITUDE)?;
        let longitude = self.numeric_values(columns::LONGITUDE)?;
        let duration_days = self.numeric_values(columns::DURATION_DAYS)?;
        let damage = self.numeric_values(columns::INFRASTRUCTURE_DAMAGE_SCORE)?;
        let economic = self.numeric_values(columns::ECONOMIC_IMPACT)?;
        let aid = self.numeric_values(columns::INTERNATIONAL_AID)?;
        let response = self.numeric_values(columns::RESPONSE_TIME_HOURS)?;
        let death_rate = self.numeric_values(columns::DEATH_RATE)?;
        let injury_rate = self.numeric_values(columns::INJURY_RATE)?;

        let optional = |array: &StringArray, row: usize| {
            (!array.is_null(row)).then(|| array.value(row).to_string())
        };

        (0..self.num_rows())
            .map(|row| {
                let status = DevelopmentStatus::from_label(status.value(row)).ok_or_else(|| {
                    Error::InvalidDataType {
                        column: columns::STATUS.to_string(),
                        expected: "development status label".to_string(),
                    }
                })?;
                let date = date.value_as_date(row).ok_or_else(|| Error::InvalidDataType {
                    column: columns::DATE.to_string(),
                    expected: "Date32".to_string(),
                })?;

                Ok(PreparedEvent {
                    event: RawEvent {
                        event_id: event_id.value(row).to_string(),
                        date,
                        year: year.value(row),
                        country: country.value(row).to_string(),
                        event_type: event_type.value(row).to_string(),
                        latitude: latitude[row],
                        longitude: longitude[row],
                        affected_population: affected_population[row],
                        deaths: deaths[row],
                        injuries: injuries[row],
                        duration_days: duration_days[row],
                        infrastructure_damage_score: damage[row],
                        economic_impact_million_usd: economic[row],
                        international_aid_million_usd: aid[row],
                        response_time_hours: response[row],
                    },
                    death_rate: death_rate[row],
                    injury_rate: injury_rate[row],
                    status,
                    response_bin: optional(response_bin, row),
                    scale: optional(scale, row),
                })
            })
            .collect()
    }
}
