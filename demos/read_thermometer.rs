//! Read every characteristic of a ThermaQ Blue and print it, then follow
//! live notifications for a short while.
//!
//! Run with: cargo run --example read_thermometer -- <ADDRESS> [fixed]
//!
//! Pass `fixed` for thermometers that report fixed-point readings.

use std::time::Duration;

use btleplug::api::{Central, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral};
use tokio::sync::broadcast;
use thermaq_rust_ble::{
    Channel, Error, ProtocolGeneration, Result, Thermometer, ThermometerConfig,
    ThermometerSnapshot, ThermometerUpdate,
};

const SCAN_TIMEOUT: Duration = Duration::from_secs(10);
const LIVE_DURATION: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("thermaq_rust_ble=debug,btleplug=warn")
        .init();

    let mut args = std::env::args().skip(1);
    let Some(address) = args.next() else {
        eprintln!("usage: read_thermometer <ADDRESS> [fixed]");
        return Ok(());
    };
    let generation = match args.next().as_deref() {
        Some("fixed") => ProtocolGeneration::FixedPoint,
        _ => ProtocolGeneration::Float,
    };

    println!("[INFO] Looking for {} ...", address);
    let (adapter, peripheral) = find_peripheral(&address).await?;

    let config = ThermometerConfig::default().with_generation(generation);
    let thermometer = Thermometer::connect(&adapter, peripheral, config).await?;
    println!("[INFO] Connected ({} protocol)\n", generation);

    if let Some(connection) = thermometer.connection() {
        let mut link_events = connection.subscribe();
        tokio::spawn(async move {
            while let Ok(event) = link_events.recv().await {
                println!("[INFO] Link {} -> {}", event.previous, event.state);
            }
        });
    }

    let snapshot = thermometer.read_snapshot().await;
    print_snapshot(&snapshot);

    println!(
        "\n[INFO] Following notifications for {:?}. Press Ctrl+C to stop.\n",
        LIVE_DURATION
    );
    let mut notifications = thermometer.start_live().await?;
    let deadline = tokio::time::sleep(LIVE_DURATION);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = tokio::signal::ctrl_c() => break,
            event = notifications.recv() => {
                let event = match event {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        println!("[WARN] Skipped {} notifications", skipped);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                match thermometer.decode_notification(&event) {
                    Ok(ThermometerUpdate::Reading { channel, reading }) => {
                        println!("{}: {}", channel, reading.status());
                    }
                    Ok(ThermometerUpdate::Battery(level)) => println!("Battery: {}", level),
                    Ok(ThermometerUpdate::CommandNotification(cn)) => {
                        println!(
                            "Command: {}, notification: {}",
                            cn.command.name(),
                            cn.notification.name()
                        );
                    }
                    Ok(other) => println!("{:?}", other),
                    Err(e) => println!("[WARN] {}", e),
                }
            }
        }
    }

    thermometer.disconnect().await?;
    println!("[INFO] Disconnected");

    Ok(())
}

async fn find_peripheral(address: &str) -> Result<(Adapter, Peripheral)> {
    let manager = Manager::new().await?;
    let adapter = manager
        .adapters()
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::ConnectionFailed {
            reason: "no Bluetooth adapter found".to_string(),
        })?;

    adapter.start_scan(ScanFilter::default()).await?;

    let started = tokio::time::Instant::now();
    while started.elapsed() < SCAN_TIMEOUT {
        for peripheral in adapter.peripherals().await? {
            if peripheral.address().to_string().eq_ignore_ascii_case(address) {
                adapter.stop_scan().await?;
                return Ok((adapter, peripheral));
            }
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    adapter.stop_scan().await?;
    Err(Error::Timeout {
        operation: format!("scan for {address}"),
    })
}

fn print_snapshot(snapshot: &ThermometerSnapshot) {
    println!("===========================================");
    println!(
        "  Snapshot at {}",
        snapshot.read_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("===========================================");

    match &snapshot.device_info {
        Ok(info) => {
            println!("Manufacturer:  {}", info.manufacturer_name);
            println!("Model:         {}", info.model_number);
            println!("Serial:        {}", info.serial_number);
            println!("Hardware rev:  {}", info.hardware_revision);
            println!("Firmware rev:  {}", info.firmware_revision);
            println!("Software rev:  {}", info.software_revision);
        }
        Err(e) => println!("Device info:   error: {}", e),
    }

    match &snapshot.battery {
        Ok(level) => println!("Battery:       {}", level),
        Err(e) => println!("Battery:       error: {}", e),
    }

    match &snapshot.device_config {
        Ok(config) => {
            println!("Unit:          {}", config.unit.symbol());
            println!("Interval:      {} s", config.measurement_interval);
            match config.auto_power_off() {
                Some(minutes) => println!("Auto off:      {} min", minutes),
                None => println!("Auto off:      disabled"),
            }
            for channel in Channel::ALL {
                println!("{} probe: {}", channel, config.probe_type(channel).name());
            }
        }
        Err(e) => println!("Device config: error: {}", e),
    }

    for channel in Channel::ALL {
        println!("\n--- {} ---", channel);
        match snapshot.channel_config(channel) {
            Ok(config) => {
                println!("Name:          {}", config.name);
                println!("High alarm:    {:?}", config.alarm_high.threshold());
                println!("Low alarm:     {:?}", config.alarm_low.threshold());
            }
            Err(e) => println!("Config:        error: {}", e),
        }
        match snapshot.reading(channel) {
            Ok(reading) => println!("Reading:       {}", reading.status()),
            Err(e) => println!("Reading:       error: {}", e),
        }
        if let Ok(trim) = &snapshot.trim {
            let trim = trim.channel(channel);
            match trim.stamp.date() {
                Some(date) => println!("Trim:          {:+.2} ({})", trim.offset, date),
                None => println!("Trim:          {:+.2}", trim.offset),
            }
        }
    }

    match &snapshot.command_notification {
        Ok(cn) => println!(
            "\nLast command: {}, notification: {}",
            cn.command.name(),
            cn.notification.name()
        ),
        Err(e) => println!("\nCommands:      error: {}", e),
    }
}
