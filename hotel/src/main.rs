//! `hotel` command-line front end.
//!
//! Each subcommand maps to one manager call. Records are printed one per
//! line, or as JSON with `--json`. Logs go to stderr.

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use hotel::manager::BookingManager;
use hotel::model::{Booking, BookingService, BookingStatus, Customer, Room, Service};
use hotel::{config, Hotel};
use hotel_orm::Enumerated;

#[derive(Parser)]
#[command(name = "hotel", about = "Hotel rooms, customers and bookings")]
struct Cli {
    /// Database file. Overrides HOTEL_DATABASE_PATH.
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Print records as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List rooms.
    Rooms {
        /// Only rooms that can be booked.
        #[arg(long)]
        available: bool,
    },
    /// List customers.
    Customers,
    /// List the bookings of one customer.
    Bookings {
        #[arg(long)]
        customer: i64,
    },
    /// Book a room. Without `--total` the stay is priced at the room rate.
    Book {
        #[arg(long)]
        customer: i64,
        #[arg(long)]
        room: i64,
        #[arg(long)]
        check_in: NaiveDate,
        #[arg(long)]
        check_out: NaiveDate,
        #[arg(long)]
        total: Option<f32>,
    },
    /// Cancel a booking and release its room.
    Cancel { booking: i64 },
    /// Move a booking to a new status (active, completed, cancelled).
    Status {
        booking: i64,
        #[arg(value_parser = parse_status)]
        status: BookingStatus,
    },
    /// Delete a customer and all of their bookings.
    DeleteCustomer { customer: i64 },
    /// Delete a room and all of its bookings.
    DeleteRoom { room: i64 },
    /// Import records from a comma-separated file with a header line.
    Import {
        kind: ImportKind,
        file: PathBuf,
        /// Record fields in column order.
        #[arg(long, value_delimiter = ',', required = true)]
        fields: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ImportKind {
    Rooms,
    Customers,
    Bookings,
    Services,
    BookingServices,
}

fn parse_status(s: &str) -> Result<BookingStatus, String> {
    BookingStatus::from_name(s).ok_or_else(|| {
        let names: Vec<_> = BookingStatus::VARIANTS.iter().map(|v| v.name()).collect();
        format!("expected one of {}", names.join(", "))
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use tracing_subscriber::fmt::format::FmtSpan;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let path = config::get_database_path(cli.database);
    tracing::debug!("Using database: {}", path.display());

    let hotel = Hotel::open(&path)
        .await
        .with_context(|| format!("opening database {}", path.display()))?;

    let result = run(&hotel, cli.command, cli.json).await;
    hotel.close().await?;
    result
}

async fn run(hotel: &Hotel, command: Commands, json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Rooms { available } => {
            let rooms = if available {
                hotel.rooms.list_available_rooms().await?
            } else {
                hotel.rooms.list_rooms().await?
            };
            print_records(json, &rooms, room_line)?;
        }
        Commands::Customers => {
            let customers = hotel.customers.list_customers().await?;
            print_records(json, &customers, customer_line)?;
        }
        Commands::Bookings { customer } => {
            let bookings = hotel.bookings.bookings_for_customer(customer).await?;
            print_records(json, &bookings, booking_line)?;
        }
        Commands::Book {
            customer,
            room,
            check_in,
            check_out,
            total,
        } => {
            let total = match total {
                Some(total) => total,
                None => {
                    let room = hotel
                        .rooms
                        .find_room(room)
                        .await?
                        .with_context(|| format!("room {room} not found"))?;
                    BookingManager::quote_total(&room, check_in, check_out)?
                }
            };
            let booking = hotel
                .bookings
                .create_booking(customer, room, check_in, check_out, total)
                .await?;
            print_records(json, &[booking], booking_line)?;
        }
        Commands::Cancel { booking } => {
            hotel.bookings.cancel_booking(booking).await?;
            println!("booking {booking} cancelled");
        }
        Commands::Status { booking, status } => {
            let booking = hotel.bookings.update_status(booking, status).await?;
            print_records(json, &[booking], booking_line)?;
        }
        Commands::DeleteCustomer { customer } => {
            let removed = hotel.customers.delete_customer_with_bookings(customer).await?;
            println!("customer {customer} deleted with {removed} booking(s)");
        }
        Commands::DeleteRoom { room } => {
            let removed = hotel.rooms.delete_room_with_bookings(room).await?;
            println!("room {room} deleted with {removed} booking(s)");
        }
        Commands::Import { kind, file, fields } => {
            let fields: Vec<&str> = fields.iter().map(|f| f.trim()).collect();
            let importer = &hotel.importer;
            let count = match kind {
                ImportKind::Rooms => importer.import_file::<Room>(&file, &fields).await?,
                ImportKind::Customers => importer.import_file::<Customer>(&file, &fields).await?,
                ImportKind::Bookings => importer.import_file::<Booking>(&file, &fields).await?,
                ImportKind::Services => importer.import_file::<Service>(&file, &fields).await?,
                ImportKind::BookingServices => {
                    importer.import_file::<BookingService>(&file, &fields).await?
                }
            };
            println!("imported {count} record(s) from {}", file.display());
        }
    }
    Ok(())
}

fn print_records<T: Serialize>(
    json: bool,
    records: &[T],
    line: fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
    } else {
        for record in records {
            println!("{}", line(record));
        }
    }
    Ok(())
}

fn id(id: Option<i64>) -> String {
    id.map_or_else(|| "-".to_string(), |id| id.to_string())
}

fn room_line(room: &Room) -> String {
    format!(
        "{:>4}  #{:<5} {:<7} {:>8.2}  {}",
        id(room.id),
        room.number,
        room.room_type.name(),
        room.price_per_night,
        if room.available { "available" } else { "occupied" }
    )
}

fn customer_line(customer: &Customer) -> String {
    format!(
        "{:>4}  {:<24} {:<28} {}",
        id(customer.id),
        customer.name,
        customer.email,
        customer.phone.as_deref().unwrap_or("-")
    )
}

fn booking_line(booking: &Booking) -> String {
    format!(
        "{:>4}  customer {:<4} room {:<4} {} -> {}  {:>8.2}  {}",
        id(booking.id),
        booking.customer_id,
        booking.room_id,
        booking.check_in,
        booking.check_out,
        booking.total_amount,
        booking.status.name()
    )
}
