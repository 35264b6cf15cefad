use crate::commands::{CmdMessage, CmdResult};
use crate::csv_io::{template_filename, write_template};
use crate::error::{RecordzError, Result};
use crate::schema::Schema;
use std::fs::{self, File};
use std::path::Path;

pub fn run(schema: &Schema, dir: &Path) -> Result<CmdResult> {
    fs::create_dir_all(dir).map_err(RecordzError::Io)?;
    let path = dir.join(template_filename(schema.name));
    let file = File::create(&path).map_err(RecordzError::Io)?;
    write_template(file, schema)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Template written to {}",
        path.display()
    )));
    Ok(result.with_written_paths(vec![path]))
}
