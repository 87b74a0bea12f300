//! Rendering movement records to the vehicle UDP log format.
//!
//! Each record becomes one line:
//!
//! ```text
//! [2024-05-01 08:30:00.250]IP:10.0.0.7, Port=5000, Descrption:OHT, Message=2,...
//! ```
//!
//! The `Descrption` key is misspelled in the format itself and consumers
//! match on it, so it is reproduced as is.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SimError;
use crate::movement::MoveRecord;

/// The constant fields of every log line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UdpTemplate {
    /// Sender IP.
    pub ip: String,
    /// Sender port.
    pub port: u16,
    /// Free-text description.
    pub description: String,
    /// Message type code.
    pub message: String,
    /// Controller id.
    pub mcp: String,
    /// Vehicle id.
    pub vehicle: String,
    /// Vehicle state code.
    pub state: String,
    /// Product code.
    pub product: String,
    /// Error code.
    pub error_code: String,
    /// Communication state code.
    pub comm_state: String,
    /// Distance field.
    pub distance: String,
    /// Run cycle code.
    pub run_cycle: String,
    /// Run cycle interval.
    pub run_cycle_interval: String,
    /// Carrier id.
    pub carrier: String,
    /// EM state code.
    pub em_state: String,
    /// Group id.
    pub group_id: String,
    /// Return priority.
    pub return_priority: String,
    /// Job detail code.
    pub job_detail: String,
    /// Move distance.
    pub move_distance: String,
}

impl Default for UdpTemplate {
    fn default() -> Self {
        let zero = || "0".to_string();
        Self {
            ip: "127.0.0.1".to_string(),
            port: 5000,
            description: "OHT".to_string(),
            message: "2".to_string(),
            mcp: "OHT".to_string(),
            vehicle: "V00001".to_string(),
            state: "1".to_string(),
            product: zero(),
            error_code: zero(),
            comm_state: "1".to_string(),
            distance: zero(),
            run_cycle: zero(),
            run_cycle_interval: zero(),
            carrier: zero(),
            em_state: zero(),
            group_id: zero(),
            return_priority: zero(),
            job_detail: zero(),
            move_distance: zero(),
        }
    }
}

impl UdpTemplate {
    /// Parse a TOML document; missing fields keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, SimError> {
        toml::from_str(s).map_err(|e| SimError::Parse {
            message: e.to_string(),
        })
    }
}

/// `YYYY-MM-DD HH:MM:SS.mmm` in UTC.
pub fn format_timestamp(timestamp_ms: u64) -> Result<String, SimError> {
    let dt = i64::try_from(timestamp_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .ok_or(SimError::TimestampOutOfRange { timestamp_ms })?;
    Ok(dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
}

/// Writes movement records as log lines to any [`Write`] sink.
pub struct UdpLogWriter<W> {
    sink: W,
    template: UdpTemplate,
    written: usize,
}

impl<W: Write> UdpLogWriter<W> {
    /// Wrap `sink`.
    pub fn new(sink: W, template: UdpTemplate) -> Self {
        Self {
            sink,
            template,
            written: 0,
        }
    }

    /// Render one record without a trailing newline.
    pub fn format_record(&self, record: &MoveRecord) -> Result<String, SimError> {
        let t = &self.template;
        Ok(format!(
            "[{ts}]IP:{ip}, Port={port}, Descrption:{desc}, Message={msg},{mcp},{vehicle},{state},\
             {product},{error_code},{comm_state},{current},{distance},{next},{run_cycle},\
             {run_cycle_interval},{carrier},{destination},{em_state},{group_id}, ,\
             {return_priority},{job_detail},{move_distance}",
            ts = format_timestamp(record.timestamp_ms)?,
            ip = t.ip,
            port = t.port,
            desc = t.description,
            msg = t.message,
            mcp = t.mcp,
            vehicle = t.vehicle,
            state = t.state,
            product = t.product,
            error_code = t.error_code,
            comm_state = t.comm_state,
            current = record.current,
            distance = t.distance,
            next = record.next,
            run_cycle = t.run_cycle,
            run_cycle_interval = t.run_cycle_interval,
            carrier = t.carrier,
            destination = record.destination,
            em_state = t.em_state,
            group_id = t.group_id,
            return_priority = t.return_priority,
            job_detail = t.job_detail,
            move_distance = t.move_distance,
        ))
    }

    /// Write one record as a line.
    pub fn write_record(&mut self, record: &MoveRecord) -> Result<(), SimError> {
        let line = self.format_record(record)?;
        writeln!(self.sink, "{line}")?;
        self.written += 1;
        Ok(())
    }

    /// Write every record, then flush. Returns the number written.
    pub fn write_all(&mut self, records: &[MoveRecord]) -> Result<usize, SimError> {
        for record in records {
            self.write_record(record)?;
        }
        self.sink.flush()?;
        debug!(records = records.len(), total = self.written, "movement log written");
        Ok(records.len())
    }

    /// Lines written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Give back the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fablink_core::AddressId;

    fn record(ts: u64, current: u64, next: u64) -> MoveRecord {
        MoveRecord {
            timestamp_ms: ts,
            current: AddressId(current),
            next: AddressId(next),
            destination: AddressId(4),
        }
    }

    #[test]
    fn timestamp_has_millisecond_precision() {
        assert_eq!(format_timestamp(0).unwrap(), "1970-01-01 00:00:00.000");
        assert_eq!(
            format_timestamp(1_714_552_200_250).unwrap(),
            "2024-05-01 08:30:00.250"
        );
        assert!(matches!(
            format_timestamp(u64::MAX),
            Err(SimError::TimestampOutOfRange { .. })
        ));
    }

    #[test]
    fn line_layout_matches_format() {
        let writer = UdpLogWriter::new(Vec::new(), UdpTemplate::default());
        let line = writer.format_record(&record(250, 1, 2)).unwrap();
        assert_eq!(
            line,
            "[1970-01-01 00:00:00.250]IP:127.0.0.1, Port=5000, Descrption:OHT, \
             Message=2,OHT,V00001,1,0,0,1,1,0,2,0,0,0,4,0,0, ,0,0,0"
        );
    }

    #[test]
    fn writes_one_line_per_record() {
        let mut writer = UdpLogWriter::new(Vec::new(), UdpTemplate::default());
        let n = writer
            .write_all(&[record(0, 1, 2), record(600, 2, 3), record(1400, 3, 4)])
            .unwrap();
        assert_eq!(n, 3);
        assert_eq!(writer.written(), 3);
        let text = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("[1970-01-01 00:00:01.400]"));
        assert!(lines[2].contains(",3,0,4,"));
    }

    #[test]
    fn template_from_toml_overrides_fields() {
        let t = UdpTemplate::from_toml_str("ip = \"10.0.0.7\"\nvehicle = \"V00042\"").unwrap();
        assert_eq!(t.ip, "10.0.0.7");
        assert_eq!(t.vehicle, "V00042");
        assert_eq!(t.port, 5000);
    }
}
