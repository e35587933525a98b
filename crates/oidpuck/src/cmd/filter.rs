use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use oidpuck_transport::ScanFilter;
use serde::Serialize;

use crate::cmd::FilterArgs;
use crate::exit::{transport_error, CliResult, SUCCESS};
use crate::output::{hex_upper, print_json, schema_id, OutputFormat};

#[derive(Serialize)]
struct FilterOutput {
    schema_id: String,
    company_identifier: u16,
    data_prefix: String,
    mask: String,
    optional_services: &'static [&'static str],
}

pub fn run(args: FilterArgs, format: OutputFormat) -> CliResult<i32> {
    let filter = ScanFilter::from_board_code(&args.code)
        .map_err(|err| transport_error("filter failed", err))?;

    match format {
        OutputFormat::Json => print_json(&FilterOutput {
            schema_id: schema_id("scan-filter"),
            company_identifier: filter.company_identifier,
            data_prefix: hex_upper(&filter.data_prefix),
            mask: hex_upper(&filter.mask),
            optional_services: filter.optional_services,
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec![
                    "company".to_string(),
                    format!("0x{:04X}", filter.company_identifier),
                ])
                .add_row(vec!["prefix".to_string(), hex_upper(&filter.data_prefix)])
                .add_row(vec!["mask".to_string(), hex_upper(&filter.mask)])
                .add_row(vec![
                    "services".to_string(),
                    filter.optional_services.join("\n"),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            println!(
                "company=0x{:04X} prefix={} mask={}",
                filter.company_identifier,
                hex_upper(&filter.data_prefix),
                hex_upper(&filter.mask)
            );
        }
    }

    Ok(SUCCESS)
}
