use std::io::{self, Write};

use crate::error::CliError;
use crate::metadata::Envelope;

pub fn render(envelope: &Envelope, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, envelope, pretty)?;
    handle.flush()?;
    Ok(())
}

fn write_json(writer: &mut impl Write, envelope: &Envelope, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, envelope)?;
    } else {
        serde_json::to_writer(&mut *writer, envelope)?;
    }
    writer.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;

    fn envelope() -> Envelope {
        Envelope {
            meta: Metadata::new("sectors", "fixture", 0),
            data: serde_json::json!([{ "name": "Technology", "changePercent": 1.25 }]),
        }
    }

    #[test]
    fn compact_output_is_one_line() {
        let mut buffer = Vec::new();
        write_json(&mut buffer, &envelope(), false).expect("writable");

        let text = String::from_utf8(buffer).expect("utf-8");
        assert_eq!(text.lines().count(), 1);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn pretty_output_round_trips() {
        let mut buffer = Vec::new();
        write_json(&mut buffer, &envelope(), true).expect("writable");

        let value: serde_json::Value = serde_json::from_slice(&buffer).expect("valid json");
        assert_eq!(value["data"][0]["name"], "Technology");
        assert!(buffer.iter().filter(|b| **b == b'\n').count() > 1);
    }
}
