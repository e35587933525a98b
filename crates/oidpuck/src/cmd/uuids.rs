use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use oidpuck_transport::gatt::CATALOGUE;
use oidpuck_transport::{lookup_uuid, GattEntry, UuidKind};
use serde::Serialize;

use crate::cmd::UuidsArgs;
use crate::exit::{CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_json, schema_id, OutputFormat};

#[derive(Serialize)]
struct UuidEntry {
    uuid: &'static str,
    name: &'static str,
    kind: &'static str,
}

#[derive(Serialize)]
struct UuidsOutput {
    schema_id: String,
    entries: Vec<UuidEntry>,
}

impl From<&GattEntry> for UuidEntry {
    fn from(entry: &GattEntry) -> Self {
        Self {
            uuid: entry.uuid,
            name: entry.name,
            kind: kind_name(entry.kind),
        }
    }
}

fn kind_name(kind: UuidKind) -> &'static str {
    match kind {
        UuidKind::Service => "service",
        UuidKind::Characteristic => "characteristic",
    }
}

pub fn run(args: UuidsArgs, format: OutputFormat) -> CliResult<i32> {
    let entries: Vec<UuidEntry> = match &args.uuid {
        Some(uuid) => {
            let entry = lookup_uuid(uuid)
                .ok_or_else(|| CliError::new(DATA_INVALID, format!("unknown UUID: {uuid}")))?;
            vec![UuidEntry::from(entry)]
        }
        None => CATALOGUE.iter().map(UuidEntry::from).collect(),
    };

    match format {
        OutputFormat::Json => print_json(&UuidsOutput {
            schema_id: schema_id("gatt-uuids"),
            entries,
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["UUID", "KIND", "NAME"]);
            for entry in &entries {
                table.add_row(vec![entry.uuid, entry.kind, entry.name]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for entry in &entries {
                println!("{} {}", entry.uuid, entry.name);
            }
        }
    }

    Ok(SUCCESS)
}
