use clap::{Parser, Subcommand};
use tokio::time::{sleep, Duration};

use crate::config::AppConfig;
use crate::models::appointment::{now_local, parse_date, Appointment, AppointmentStatus};
use crate::service::confirm_prompt::InquireConfirm;
use crate::service::conflict_service::{ConflictOracle, ConflictPolicy, SimulatedCalendar};
use crate::service::suggestion_service::{GeminiService, SuggestionService};
use crate::service::tracker_service::{Tracker, SAVE_INDICATOR_MS};
use crate::storage;

const BOOKING_URL: &str = "https://bullcutcasteldazzano.setmore.com/";

#[derive(Parser)]
#[command(name = "barbertrack", about = "Track barber appointments from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new appointment (date like 2024-01-10T10:00)
    Add { date: String },
    /// Show all appointments with their projected next dates
    List,
    /// Flip an appointment between planned and completed
    Toggle { id: String },
    /// Change an appointment's recurrence interval in days
    Frequency { id: String, days: String },
    /// Delete an appointment after confirmation
    Delete { id: String },
    /// Change the fallback recurrence used when no appointments exist
    DefaultFrequency { days: i64 },
    /// Ask for a natural-language next-date suggestion
    Suggest,
    /// Run the simulated calendar check for a candidate date
    CheckConflict {
        date: String,
        /// Existing commitments for the AI overlap analysis
        #[arg(long = "event")]
        events: Vec<String>,
    },
    /// Print setup notes and the external booking link
    Guide,
}

pub async fn cli(config: &AppConfig) {
    // Fine to panic here
    let cli = Cli::parse();
    let data_dir = config
        .get("DB_LOCATION")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(storage::get_db_location);
    let mut tracker = Tracker::new(data_dir.clone());
    tracker.load();

    match &cli.command {
        Commands::Add { date } => match tracker.add_appointment(date) {
            Ok(id) => {
                show_save_indicator(&mut tracker).await;
                println!("Added appointment {}", id);
            }
            Err(e) => println!("Failed to add appointment: {}", e),
        },
        Commands::List => render_list(&tracker),
        Commands::Toggle { id } => match tracker.toggle_status(id) {
            Ok(()) => show_save_indicator(&mut tracker).await,
            Err(e) => println!("Failed to update appointment: {}", e),
        },
        Commands::Frequency { id, days } => match tracker.update_frequency(id, days) {
            Ok(days) => {
                show_save_indicator(&mut tracker).await;
                println!("Recurrence set to every {} days", days);
            }
            Err(e) => println!("Failed to update frequency: {}", e),
        },
        Commands::Delete { id } => {
            match tracker.delete_appointment(id, &InquireConfirm).await {
                Ok(true) => {
                    show_save_indicator(&mut tracker).await;
                    println!("Appointment deleted");
                }
                Ok(false) => println!("Nothing deleted"),
                Err(e) => println!("Failed to delete appointment: {}", e),
            }
        }
        Commands::DefaultFrequency { days } => {
            match tracker.set_default_frequency(*days) {
                Ok(()) => println!(
                    "Default frequency set to {} days",
                    tracker.settings().frequency_days
                ),
                Err(e) => println!("Failed to update settings: {}", e),
            }
        }
        Commands::Suggest => {
            let generator =
                GeminiService::new(config.get("GEMINI_API_KEY").unwrap_or_default());
            let last = tracker.appointments().last();
            let frequency = last
                .map(|appointment| appointment.effective_frequency())
                .unwrap_or(tracker.settings().frequency_days);
            let advice =
                SuggestionService::suggest_next_date(last, frequency, &generator).await;
            println!("{}", advice.text());
        }
        Commands::CheckConflict { date, events } => {
            let Some(candidate) = parse_date(date) else {
                println!("Could not parse date: {}", date);
                return;
            };
            println!("Checking your calendar...");
            let oracle = SimulatedCalendar::new(ConflictPolicy::from_config(config));
            let verdict = oracle.check(candidate).await;
            println!("{}", verdict.message);

            if !events.is_empty() {
                let generator =
                    GeminiService::new(config.get("GEMINI_API_KEY").unwrap_or_default());
                let analysis =
                    SuggestionService::analyze_conflict(candidate, events, &generator).await;
                println!("{}", analysis.text());
            }
        }
        Commands::Guide => render_guide(&data_dir),
    }
}

fn render_list(tracker: &Tracker) {
    if tracker.appointments().is_empty() {
        println!("No appointments stored yet.");
        println!(
            "They are saved automatically under {}",
            tracker.data_dir().display()
        );
        return;
    }
    let now = now_local();
    for appointment in tracker.appointments() {
        println!("{}", render_row(appointment, now));
    }
}

fn render_row(appointment: &Appointment, now: chrono::NaiveDateTime) -> String {
    let status = match appointment.status {
        AppointmentStatus::Planned => "planned",
        AppointmentStatus::Completed => "completed",
    };
    let overdue = if appointment.is_overdue(now) {
        " OVERDUE"
    } else {
        ""
    };
    format!(
        "{}  {}  [{}{}]  every {} days  next: {}",
        appointment.id,
        appointment.date.format("%a %d %b %Y %H:%M"),
        status,
        overdue,
        appointment.effective_frequency(),
        appointment.projected_next_date().format("%a %d %b %Y %H:%M"),
    )
}

async fn show_save_indicator(tracker: &mut Tracker) {
    println!("Saving...");
    sleep(Duration::from_millis(SAVE_INDICATOR_MS)).await;
    tracker.mark_synced();
    println!("Synced");
}

fn render_guide(data_dir: &std::path::Path) {
    println!("barbertrack keeps everything on this machine.");
    println!();
    println!("Data directory: {}", data_dir.display());
    println!("  appointments.json  the appointment list");
    println!("  settings.json      the default recurrence");
    println!();
    println!("Optional configuration (CONFIG_FILE or environment):");
    println!("  GEMINI_API_KEY       enables AI suggestions and conflict analysis");
    println!("  DB_LOCATION          overrides the data directory");
    println!("  CONFLICT_BUSY_START, CONFLICT_BUSY_END, CONFLICT_CHANCE,");
    println!("  CONFLICT_LATENCY_MS  tune the simulated calendar check");
    println!();
    println!("Book online: {}", BOOKING_URL);
}
