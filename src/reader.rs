use crate::error::SalesError;
use std::path::Path;

/// Reads the raw sales log and returns its data lines: header removed,
/// every line trimmed, blank lines skipped.
pub fn read_sales_lines(path: &Path) -> Result<Vec<String>, SalesError> {
    let bytes = std::fs::read(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            SalesError::InputNotFound(path.to_path_buf())
        } else {
            SalesError::Read {
                path: path.to_path_buf(),
                source: err,
            }
        }
    })?;

    let text = decode(bytes);
    Ok(data_lines(&text))
}

fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            log::warn!("input is not valid UTF-8, decoding as Latin-1");
            // Latin-1 maps every byte straight onto the first 256 code points.
            err.into_bytes().iter().map(|&byte| char::from(byte)).collect()
        }
    }
}

fn data_lines(text: &str) -> Vec<String> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    text.lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn drops_header_and_blank_lines() {
        let text = "TransactionID|Date\n  T1|a  \n\n\r\nT2|b\r\n";
        assert_eq!(data_lines(text), vec!["T1|a".to_string(), "T2|b".to_string()]);
    }

    #[test]
    fn falls_back_to_latin1() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"header\nT1|Caf\xe9\n").unwrap();
        let lines = read_sales_lines(file.path()).unwrap();
        assert_eq!(lines, vec!["T1|Caf\u{e9}".to_string()]);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_sales_lines(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, SalesError::InputNotFound(_)));
    }
}
