use anyhow::{anyhow, bail, Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// WAL operation types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalOperation {
    CreateReservation {
        id: u64,
        row: usize,
        column: usize,
        e_ticket: String,
        created: i64,
        passenger_name: String,
    },
    DeleteReservation {
        id: u64,
    },
    AddAdmin {
        username: String,
        password: String,
    },
}

impl WalOperation {
    // Free text is hex-encoded so it can never contain the separator
    fn encode(&self) -> String {
        match self {
            WalOperation::CreateReservation {
                id,
                row,
                column,
                e_ticket,
                created,
                passenger_name,
            } => format!(
                "CREATE_RESERVATION|{}|{}|{}|{}|{}|{}",
                id,
                row,
                column,
                e_ticket,
                created,
                hex::encode(passenger_name)
            ),
            WalOperation::DeleteReservation { id } => format!("DELETE_RESERVATION|{}", id),
            WalOperation::AddAdmin { username, password } => format!(
                "ADD_ADMIN|{}|{}",
                hex::encode(username),
                hex::encode(password)
            ),
        }
    }

    fn decode(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.split('|').collect();

        match parts.first() {
            Some(&"CREATE_RESERVATION") => {
                if parts.len() != 7 {
                    bail!("Invalid CREATE_RESERVATION format");
                }
                let id = parts[1].parse::<u64>().context("Invalid reservation ID")?;
                let row = parts[2].parse::<usize>().context("Invalid seat row")?;
                let column = parts[3].parse::<usize>().context("Invalid seat column")?;
                let e_ticket = parts[4].to_string();
                if e_ticket.is_empty() {
                    bail!("e_ticket must not be empty");
                }
                let created = parts[5].parse::<i64>().context("Invalid creation timestamp")?;
                let passenger_name = decode_text(parts[6]).context("Invalid passenger name")?;

                Ok(WalOperation::CreateReservation {
                    id,
                    row,
                    column,
                    e_ticket,
                    created,
                    passenger_name,
                })
            }
            Some(&"DELETE_RESERVATION") => {
                if parts.len() != 2 {
                    bail!("Invalid DELETE_RESERVATION format");
                }
                let id = parts[1].parse::<u64>().context("Invalid reservation ID")?;

                Ok(WalOperation::DeleteReservation { id })
            }
            Some(&"ADD_ADMIN") => {
                if parts.len() != 3 {
                    bail!("Invalid ADD_ADMIN format");
                }
                let username = decode_text(parts[1]).context("Invalid admin username")?;
                let password = decode_text(parts[2]).context("Invalid admin password")?;

                Ok(WalOperation::AddAdmin { username, password })
            }
            _ => bail!("Unknown operation type"),
        }
    }
}

fn decode_text(field: &str) -> Result<String> {
    let bytes = hex::decode(field).context("Invalid hex")?;
    String::from_utf8(bytes).context("Text is not valid UTF-8")
}

/// Append-only operation log backing the in-memory stores
pub struct Wal {
    file: Mutex<File>,
    path: PathBuf,
}

impl Wal {
    /// Open the log for appending
    ///
    /// A record cut short by a crash is dropped first, so the next append
    /// starts on a fresh line.
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(dropped) = truncate_torn_tail(&path)? {
            tracing::warn!(
                path = %path.display(),
                dropped_bytes = dropped,
                "WAL ended mid-record, truncated to the last complete line"
            );
        }
        let file = open_append(&path)?;

        Ok(Wal {
            file: Mutex::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one operation and flush it to disk before returning
    pub fn log_operation(&self, op: &WalOperation) -> Result<()> {
        let line = op.encode();
        let mut file = self.file.lock().map_err(|_| anyhow!("WAL lock poisoned"))?;
        writeln!(file, "{}", line).context("Failed to write to WAL")?;
        file.flush().context("Failed to flush WAL")?;
        file.sync_data().context("Failed to sync WAL")?;
        Ok(())
    }

    pub fn replay(&self) -> Result<Vec<WalOperation>> {
        let file = File::open(&self.path).context("Failed to open WAL for replay")?;
        let reader = BufReader::new(file);
        let mut operations = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result.context("Failed to read line from WAL")?;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            match WalOperation::decode(line) {
                Ok(op) => operations.push(op),
                Err(e) => {
                    tracing::warn!(
                        line_num = line_num + 1,
                        error = %e,
                        "Failed to parse WAL line, skipping"
                    );
                }
            }
        }

        Ok(operations)
    }

    /// Replace the log with `operations`
    ///
    /// The snapshot is written to a sibling file and renamed into place, so a
    /// crash leaves either the old log or the new one. Appends are blocked
    /// for the duration.
    pub fn rewrite(&self, operations: &[WalOperation]) -> Result<()> {
        let mut file = self.file.lock().map_err(|_| anyhow!("WAL lock poisoned"))?;

        let tmp_path = self.path.with_extension("compact");
        {
            let tmp = File::create(&tmp_path).context("Failed to create WAL snapshot")?;
            let mut writer = BufWriter::new(tmp);
            for op in operations {
                writeln!(writer, "{}", op.encode()).context("Failed to write WAL snapshot")?;
            }
            let tmp = writer
                .into_inner()
                .map_err(|e| anyhow!("Failed to flush WAL snapshot: {}", e.error()))?;
            tmp.sync_all().context("Failed to sync WAL snapshot")?;
        }

        fs::rename(&tmp_path, &self.path).context("Failed to replace WAL with snapshot")?;
        *file = open_append(&self.path)?;

        Ok(())
    }
}

/// Cut the file back to its last newline when it does not end with one
///
/// Returns the number of bytes removed. An unterminated record was never
/// acknowledged, since `log_operation` syncs the newline before returning.
fn truncate_torn_tail(path: &Path) -> Result<Option<u64>> {
    let mut file = match OpenOptions::new().read(true).write(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).context("Failed to open WAL for recovery"),
    };

    let len = file.metadata().context("Failed to stat WAL")?.len();
    if len == 0 {
        return Ok(None);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1)).context("Failed to seek WAL")?;
    file.read_exact(&mut last).context("Failed to read WAL tail")?;
    if last[0] == b'\n' {
        return Ok(None);
    }

    // Scan backwards for the end of the last complete line
    let mut buf = [0u8; 4096];
    let mut end = len;
    let mut keep = 0;
    while end > 0 {
        let start = end.saturating_sub(buf.len() as u64);
        let chunk = &mut buf[..(end - start) as usize];
        file.seek(SeekFrom::Start(start)).context("Failed to seek WAL")?;
        file.read_exact(chunk).context("Failed to read WAL")?;
        if let Some(pos) = chunk.iter().rposition(|b| *b == b'\n') {
            keep = start + pos as u64 + 1;
            break;
        }
        end = start;
    }

    file.set_len(keep).context("Failed to truncate WAL")?;
    file.sync_all().context("Failed to sync WAL")?;

    Ok(Some(len - keep))
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context("Failed to open WAL file")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_reservation(id: u64, name: &str) -> WalOperation {
        WalOperation::CreateReservation {
            id,
            row: 3,
            column: 2,
            e_ticket: "A1B2C3D4E5F6".to_string(),
            created: 1_700_000_000,
            passenger_name: name.to_string(),
        }
    }

    #[test]
    fn test_wal_line_format() {
        let op = sample_reservation(7, "Ada Lovelace");
        assert_eq!(
            op.encode(),
            format!(
                "CREATE_RESERVATION|7|3|2|A1B2C3D4E5F6|1700000000|{}",
                hex::encode("Ada Lovelace")
            )
        );

        assert_eq!(WalOperation::DeleteReservation { id: 7 }.encode(), "DELETE_RESERVATION|7");
    }

    #[test]
    fn test_separator_in_text_fields() {
        let op = WalOperation::AddAdmin {
            username: "ops|admin".to_string(),
            password: "p|a|s|s".to_string(),
        };
        assert_eq!(WalOperation::decode(&op.encode()).unwrap(), op);

        let op = sample_reservation(1, "Jean | Luc");
        assert_eq!(WalOperation::decode(&op.encode()).unwrap(), op);
    }

    #[test]
    fn test_wal_log_and_replay() {
        let temp_dir = TempDir::new().unwrap();
        let wal = Wal::new(temp_dir.path().join("test.wal")).unwrap();

        wal.log_operation(&WalOperation::AddAdmin {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        })
        .unwrap();
        wal.log_operation(&sample_reservation(1, "Ada Lovelace")).unwrap();
        wal.log_operation(&WalOperation::DeleteReservation { id: 1 }).unwrap();

        let operations = wal.replay().unwrap();
        assert_eq!(operations.len(), 3);

        match &operations[0] {
            WalOperation::AddAdmin { username, password } => {
                assert_eq!(username, "admin");
                assert_eq!(password, "admin123");
            }
            _ => panic!("Expected AddAdmin"),
        }
        assert_eq!(operations[1], sample_reservation(1, "Ada Lovelace"));
        assert_eq!(operations[2], WalOperation::DeleteReservation { id: 1 });
    }

    #[test]
    fn test_wal_invalid_lines() {
        let temp_dir = TempDir::new().unwrap();
        let wal_path = temp_dir.path().join("test.wal");

        fs::write(
            &wal_path,
            "INVALID_OP|data\nDELETE_RESERVATION|not-a-number\nCREATE_RESERVATION|1|0|0|ABC|0|zz\nDELETE_RESERVATION|4\n",
        )
        .unwrap();

        let wal = Wal::new(wal_path).unwrap();
        let operations = wal.replay().unwrap();

        assert_eq!(operations, vec![WalOperation::DeleteReservation { id: 4 }]);
    }

    #[test]
    fn test_torn_record_is_dropped_on_open() {
        let temp_dir = TempDir::new().unwrap();
        let wal_path = temp_dir.path().join("test.wal");

        let admin = WalOperation::AddAdmin {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        };
        fs::write(
            &wal_path,
            format!("{}\nCREATE_RESERVATION|9|0|0|AB", admin.encode()),
        )
        .unwrap();

        let wal = Wal::new(wal_path.clone()).unwrap();
        assert_eq!(wal.replay().unwrap(), vec![admin.clone()]);

        wal.log_operation(&sample_reservation(1, "Ada Lovelace")).unwrap();
        drop(wal);

        // The record written after recovery survives the next restart
        let wal = Wal::new(wal_path).unwrap();
        assert_eq!(
            wal.replay().unwrap(),
            vec![admin, sample_reservation(1, "Ada Lovelace")]
        );
    }

    #[test]
    fn test_torn_first_record_empties_log() {
        let temp_dir = TempDir::new().unwrap();
        let wal_path = temp_dir.path().join("test.wal");
        fs::write(&wal_path, "CREATE_RESERV").unwrap();

        let wal = Wal::new(wal_path.clone()).unwrap();
        assert!(wal.replay().unwrap().is_empty());
        assert_eq!(fs::metadata(&wal_path).unwrap().len(), 0);
    }

    #[test]
    fn test_complete_log_is_untouched_on_open() {
        let temp_dir = TempDir::new().unwrap();
        let wal_path = temp_dir.path().join("test.wal");
        fs::write(&wal_path, "DELETE_RESERVATION|4\n").unwrap();

        let wal = Wal::new(wal_path.clone()).unwrap();
        assert_eq!(wal.replay().unwrap(), vec![WalOperation::DeleteReservation { id: 4 }]);
        assert_eq!(fs::read_to_string(&wal_path).unwrap(), "DELETE_RESERVATION|4\n");
    }

    #[test]
    fn test_wal_rewrite_replaces_contents() {
        let temp_dir = TempDir::new().unwrap();
        let wal = Wal::new(temp_dir.path().join("test.wal")).unwrap();

        wal.log_operation(&sample_reservation(1, "Ada Lovelace")).unwrap();
        wal.log_operation(&sample_reservation(2, "Grace Hopper")).unwrap();
        wal.log_operation(&WalOperation::DeleteReservation { id: 1 }).unwrap();

        wal.rewrite(&[sample_reservation(2, "Grace Hopper")]).unwrap();
        assert_eq!(wal.replay().unwrap(), vec![sample_reservation(2, "Grace Hopper")]);

        // Appends after a rewrite land in the new file
        wal.log_operation(&WalOperation::DeleteReservation { id: 2 }).unwrap();
        assert_eq!(wal.replay().unwrap().len(), 2);
        assert!(!temp_dir.path().join("test.compact").exists());
    }
}
