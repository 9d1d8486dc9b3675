//! Audio device listing command.

use clap::{Args, Subcommand};
use xover_io::{AudioDevice, DeviceList, default_device, find_device, list_devices};

#[derive(Args, Debug)]
pub struct DevicesArgs {
    #[command(subcommand)]
    command: Option<DevicesCommand>,
}

#[derive(Subcommand, Debug)]
enum DevicesCommand {
    /// List all available audio devices
    List,

    /// Show default device information
    Info,

    /// Resolve a device by index or partial name, as `run` would
    Find {
        /// Device index or partial name
        query: String,

        /// Search input devices instead of output devices
        #[arg(long)]
        input: bool,
    },
}

pub fn run(args: DevicesArgs) -> anyhow::Result<()> {
    match args.command.unwrap_or(DevicesCommand::List) {
        DevicesCommand::List => {
            let devices = list_devices()?;
            if devices.inputs.is_empty() && devices.outputs.is_empty() {
                println!("No audio devices found.");
                return Ok(());
            }
            print!("{}", render_list(&devices));
            println!();
            println!("Tip: pass an index or partial name to --input-device/--output-device:");
            println!("  xover run --input-device 0 --output-device \"USB\" -f 800");
        }

        DevicesCommand::Info => {
            let (input, output) = default_device()?;
            println!("Default Input:  {}", describe(input.as_ref()));
            println!("Default Output: {}", describe(output.as_ref()));
        }

        DevicesCommand::Find { query, input } => {
            let (index, device) = find_device(&query, input)?;
            println!("[{index}] {}", describe(Some(&device)));
        }
    }

    Ok(())
}

/// Indexed input and output sections. Indices match what `run` accepts.
fn render_list(devices: &DeviceList) -> String {
    let mut out = String::new();

    for (title, section) in [
        ("Input Devices", &devices.inputs),
        ("Output Devices", &devices.outputs),
    ] {
        if section.is_empty() {
            continue;
        }
        out.push_str(&format!("{title}:\n"));
        for (index, device) in section.iter().enumerate() {
            out.push_str(&format!(
                "  [{index}] {} ({} Hz)\n",
                device.name, device.default_sample_rate
            ));
        }
    }
    out.push_str(&format!(
        "Total: {} input(s), {} output(s)\n",
        devices.inputs.len(),
        devices.outputs.len()
    ));
    out
}

fn describe(device: Option<&AudioDevice>) -> String {
    match device {
        Some(d) => format!("{} ({} Hz)", d.name, d.default_sample_rate),
        None => "none".to_string(),
    }
}
