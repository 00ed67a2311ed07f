use anyhow::Context;
use attendance_etl::adapters::{JsonRepository, LocalStorage, XlsxReader};
use attendance_etl::core::attendance::DATE_FORMAT;
use attendance_etl::core::etl::ImportEngine;
use attendance_etl::core::session::Session;
use attendance_etl::utils::error::{AttendanceError, ErrorCategory};
use attendance_etl::utils::{logger, validation::Validate};
use attendance_etl::{AttendanceEntry, CliConfig, Command, Employee};
use chrono::{Local, NaiveDate};
use clap::Parser;

type AppSession = Session<JsonRepository<LocalStorage>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入配置
    let config = cli
        .app_config()
        .with_context(|| format!("failed to load configuration {:?}", cli.config))?;

    logger::init_logger(config.logging.format, cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    // 驗證配置
    if let Err(e) = cli.validate().and_then(|_| config.validate()) {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(exit_code(&e));
    }

    let storage = LocalStorage::new(config.storage.data_dir.clone());
    let repository = JsonRepository::with_files(
        storage,
        config.storage.employees_file.clone(),
        config.storage.attendance_file.clone(),
    );
    let mut session = Session::open(repository, config.session.seed_sample_data).await;

    if let Err(e) = run(&cli.command, &mut session).await {
        tracing::error!("❌ {} (Category: {:?})", e, e.category());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(exit_code(&e));
    }

    Ok(())
}

async fn run(command: &Command, session: &mut AppSession) -> attendance_etl::Result<()> {
    match command {
        Command::Employees => {
            for employee in session.directory().list() {
                print_employee_line(employee);
            }
        }
        Command::Show {
            employee_id,
            limit,
            from,
            to,
        } => show_profile(session, employee_id, *limit, *from, *to),
        Command::AddEmployee { .. } => {
            if let Some(employee) = command.employee() {
                let id = employee.employee_id.clone();
                session.upsert_employee(employee).await?;
                println!("✅ Saved employee {}", id);
            }
        }
        Command::ClockIn {
            employee_id,
            date,
            time,
        } => {
            let (date, time) = date_and_time(date, time);
            let entry = session.clock_in(employee_id, &date, &time).await?;
            print_entry(&entry);
        }
        Command::ClockOut {
            employee_id,
            date,
            time,
        } => {
            let (date, time) = date_and_time(date, time);
            let entry = session.clock_out(employee_id, &date, &time).await?;
            print_entry(&entry);
        }
        Command::Hours {
            employee_id,
            from,
            to,
        } => {
            let summary = session.aggregator().summary(employee_id, *from, *to);
            println!("Total hours: {:.2}", summary.all_time);
            println!("Filtered hours: {}", format_hours(summary.in_range));
        }
        Command::Import { file } => {
            let engine = ImportEngine::new(LocalStorage::new("."), XlsxReader::new());
            let summary = engine.run(file, session).await?;
            println!("✅ {}", summary);
        }
    }
    Ok(())
}

/// Fills in today's date and the current `HH:MM` when not given.
fn date_and_time(date: &Option<NaiveDate>, time: &Option<String>) -> (String, String) {
    let now = Local::now();
    (
        date.unwrap_or_else(|| now.date_naive())
            .format(DATE_FORMAT)
            .to_string(),
        time.clone().unwrap_or_else(|| now.format("%H:%M").to_string()),
    )
}

fn show_profile(
    session: &AppSession,
    employee_id: &str,
    limit: usize,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) {
    match session.directory().get(employee_id) {
        Some(employee) => {
            println!("Employee:   {}", employee.employee_id);
            println!("Name:       {}", or_dash(&employee.name));
            println!("Department: {}", or_dash(&employee.department));
            println!("Role:       {}", or_dash(&employee.role));
            println!("Status:     {}", employee.status);
            println!("Joined:     {}", or_dash(&employee.join_date));
        }
        None => println!("Employee {} has no profile", employee_id),
    }

    let summary = session.aggregator().summary(employee_id, from, to);
    println!("Total hours:    {:.2}", summary.all_time);
    println!("Filtered hours: {}", format_hours(summary.in_range));

    println!();
    println!("{:<12} {:<10} {:<10} {}", "Date", "Clock In", "Clock Out", "Hours");
    for entry in session.attendance().query(employee_id).into_iter().take(limit) {
        print_entry(entry);
    }
}

fn print_employee_line(employee: &Employee) {
    println!(
        "{:<8} {:<20} {:<14} {:<12} {}",
        employee.employee_id, employee.name, employee.department, employee.role, employee.status
    );
}

fn print_entry(entry: &AttendanceEntry) {
    println!(
        "{:<12} {:<10} {:<10} {}",
        entry.date,
        entry.clock_in.as_deref().unwrap_or(""),
        entry.clock_out.as_deref().unwrap_or(""),
        entry.hours.map(|h| h.to_string()).unwrap_or_default()
    );
}

fn format_hours(hours: Option<f64>) -> String {
    hours.map(|h| format!("{:.2}", h)).unwrap_or_else(|| "-".to_string())
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn exit_code(error: &AttendanceError) -> i32 {
    match error.category() {
        ErrorCategory::Configuration => 1,
        ErrorCategory::ImportFormat | ErrorCategory::UnsupportedFile => 2,
        ErrorCategory::Io => 3,
        ErrorCategory::Storage => 4,
    }
}
