use std::{ops::Range, str::FromStr};

use logos::Logos;
use miette::Diagnostic;
use thiserror::Error;
use time::Time;

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t]+")]
enum Token {
    #[token("TEMPERATURE LOG for ")]
    TemperatureLog,

    #[token("UNIT:")]
    Unit,

    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,
    #[regex("º[CF]")]
    UnitSymbol,
    #[regex("[a-zA-Z]+")]
    String,

    #[token("\n")]
    Crlf,
    #[token("---")]
    MissingData,
    #[token(":")]
    Colon,
}

#[derive(Debug, Clone)]
pub struct Log {
    pub header: Header,
    // Observations should be sorted by time of day
    pub observations: Vec<Observation>,
}

impl Log {
    pub fn first_time(&self) -> Time {
        self.observations.first().unwrap().time
    }

    pub fn last_time(&self) -> Time {
        self.observations.last().unwrap().time
    }

    pub fn temperature_range(&self) -> Range<f32> {
        self.observations
            .iter()
            .map(|obs| obs.value)
            .min_by(|left, right| left.total_cmp(right))
            .unwrap()
            ..self
                .observations
                .iter()
                .map(|obs| obs.value)
                .max_by(|left, right| left.total_cmp(right))
                .unwrap()
    }

    /// Summary of the whole log, always reported in Fahrenheit whatever
    /// the unit the observations were taken in.
    pub fn stats(&self) -> Stats {
        match self.header.unit {
            TemperatureUnit::Fahrenheit => {
                let temperatures: Vec<_> = self
                    .observations
                    .iter()
                    .map(|obs| TemperatureFahrenheit::new(obs.value))
                    .collect();
                compute_statistics(&temperatures)
            }
            TemperatureUnit::Celsius => {
                let temperatures: Vec<_> = self
                    .observations
                    .iter()
                    .map(|obs| TemperatureCelsius::new(obs.value))
                    .collect();
                compute_statistics(&temperatures)
            }
        }
    }

    /// Can only merge logs taken with the exact same header.
    /// Observations of `other` are appended after ours.
    pub fn merge(&mut self, mut other: Self) -> Result<(), String> {
        if self.header != other.header {
            return Err(String::from("Header differs"));
        }

        self.observations.append(&mut other.observations);

        Ok(())
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    HeaderError(#[from] HeaderError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    ParseObservationError(#[from] ParseObservationError),
}

impl FromStr for Log {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines();
        let header = Header::parse(&mut lines)?;

        // Skip everything until the big bar
        loop {
            let line = lines.next().unwrap();
            if !line.is_empty() && line.chars().all(|c| c == '-') {
                break;
            }
        }

        let mut observations: Vec<Observation> = Vec::new();

        // Parse all observations until the next big bar
        loop {
            let line = lines.next().unwrap();
            if line.chars().all(|c| c == '-') {
                break;
            }

            let observation = match Observation::parse(line) {
                Ok(observation) => observation,
                Err(ParseObservationError::EmptyObservation) => continue,
                Err(e) => return Err(e.into()),
            };

            if let Some(o) = observations.last() {
                if o.time >= observation.time {
                    eprintln!("observations are not ordered");
                }
            }
            observations.push(observation);
        }

        Ok(Self {
            header,
            observations,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub unit: TemperatureUnit,
}

#[derive(Debug, Error, Diagnostic)]
pub enum HeaderError {
    #[error("Missing title")]
    MissingTitle,
    #[error("Bad title")]
    BadTitle,
    #[error("Bad unit: {0}")]
    BadUnit(String),
    #[error("Bad header")]
    BadHeader,
}

impl Header {
    pub fn parse<'a>(mut lines: impl Iterator<Item = &'a str>) -> Result<Self, HeaderError> {
        let title = lines.next().ok_or(HeaderError::MissingTitle)?;
        let mut title = Token::lexer(title);
        match title.next() {
            Some(Ok(Token::TemperatureLog)) => (),
            _ => return Err(HeaderError::BadTitle),
        };
        let name = match title.next() {
            Some(Ok(Token::String)) => title.slice().to_string(),
            _ => return Err(HeaderError::BadTitle),
        };

        let empty = lines.next().ok_or(HeaderError::BadHeader)?;
        assert!(empty.is_empty());

        let unit_line = lines.next().ok_or(HeaderError::BadHeader)?;
        let mut unit_line = Token::lexer(unit_line);
        match unit_line.next() {
            Some(Ok(Token::Unit)) => (),
            _ => return Err(HeaderError::BadHeader),
        };
        let unit = match unit_line.next() {
            Some(Ok(Token::UnitSymbol)) => unit_line.slice().parse().unwrap(),
            _ => return Err(HeaderError::BadUnit(unit_line.slice().to_string())),
        };

        Ok(Self { name, unit })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Observation {
    pub time: Time,
    pub value: f32,
}

#[derive(Debug, Error, Diagnostic)]
pub enum ParseObservationError {
    #[error("Invalid time: {0}")]
    InvalidTime(#[from] time::error::ComponentRange),
    #[error("Empty observation")]
    EmptyObservation,
    #[error("Bad observation")]
    BadObservation,
    #[error("Bad field: {0}")]
    BadField(String),
}

impl Observation {
    pub fn parse(s: &str) -> Result<Self, ParseObservationError> {
        let mut observation = Token::lexer(s);
        let hour = match observation.next() {
            Some(Ok(Token::Number)) => observation.slice().parse().unwrap(),
            None => return Err(ParseObservationError::EmptyObservation),
            _ => return Err(ParseObservationError::BadObservation),
        };
        match observation.next() {
            Some(Ok(Token::Colon)) => (),
            _ => {
                return Err(ParseObservationError::BadField(String::from(
                    "Bad time colon",
                )))
            }
        };
        let minute = match observation.next() {
            Some(Ok(Token::Number)) => observation.slice().parse().unwrap(),
            _ => {
                return Err(ParseObservationError::BadField(String::from(
                    "Bad time minute",
                )))
            }
        };
        let time = Time::from_hms(hour, minute, 0)?;

        let value = match observation.next() {
            Some(Ok(Token::Number)) => observation.slice().parse().unwrap(),
            Some(Ok(Token::MissingData)) => return Err(ParseObservationError::EmptyObservation),
            None => {
                return Err(ParseObservationError::BadField(String::from(
                    "Missing temperature",
                )))
            }
            Some(Ok(token)) => {
                return Err(ParseObservationError::BadField(format!(
                    "Bad temperature token: {:?}",
                    token
                )))
            }
            a => {
                return Err(ParseObservationError::BadField(format!(
                    "Bad temperature: {:?}",
                    a
                )))
            }
        };

        Ok(Self { time, value })
    }
}

/// A temperature read in Fahrenheit.
///
/// The raw value can only be wrapped explicitly, a bare float never turns
/// into a Fahrenheit reading by accident.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureFahrenheit(f32);

impl TemperatureFahrenheit {
    pub fn new(fahrenheit: f32) -> Self {
        Self(fahrenheit)
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn to_celsius(self) -> f32 {
        (self.0 - 32.0) * 5.0 / 9.0
    }
}

/// A temperature read in Celsius.
///
/// Same contract as [`TemperatureFahrenheit`]: explicit wrapping only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureCelsius(f32);

impl TemperatureCelsius {
    pub fn new(celsius: f32) -> Self {
        Self(celsius)
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn to_fahrenheit(self) -> f32 {
        self.0 * 9.0 / 5.0 + 32.0
    }
}

/// Anything the statistics engine can reduce. Unit-wrapped temperatures
/// resolve to their Fahrenheit equivalent so every summary comes out in
/// the same unit.
pub trait Sample {
    fn sample(&self) -> f32;
}

impl Sample for f32 {
    fn sample(&self) -> f32 {
        *self
    }
}

impl Sample for TemperatureFahrenheit {
    fn sample(&self) -> f32 {
        self.value()
    }
}

impl Sample for TemperatureCelsius {
    fn sample(&self) -> f32 {
        self.to_fahrenheit()
    }
}

/// Summary of a dataset: the arithmetic mean plus both extrema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub average: f32,
    pub max: f32,
    pub min: f32,
}

/// Reduce a dataset to its summary in a single pass.
///
/// An empty dataset is not an error, the three fields all come back NaN.
pub fn compute_statistics<T: Sample>(values: &[T]) -> Stats {
    if values.is_empty() {
        return Stats {
            average: f32::NAN,
            max: f32::NAN,
            min: f32::NAN,
        };
    }

    let mut sum = 0.0;
    let mut max = values[0].sample();
    let mut min = max;

    for value in values {
        let value = value.sample();
        sum += value;
        if value > max {
            max = value;
        }
        if value < min {
            min = value;
        }
    }

    Stats {
        average: sum / values.len() as f32,
        max,
        min,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureUnit {
    Fahrenheit,
    Celsius,
}

impl FromStr for TemperatureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ºF" => Ok(Self::Fahrenheit),
            "ºC" => Ok(Self::Celsius),
            s => Err(format!(
                "Unknown temperature unit {s}. Expecting `ºF` or `ºC`"
            )),
        }
    }
}
