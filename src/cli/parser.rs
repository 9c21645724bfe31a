use crate::export::{ExportFormat, ExportTarget};
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for glamstudio
/// CLI application to run a beauty studio: clients, services, appointments and invoices
#[derive(Parser)]
#[command(
    name = "glamstudio",
    version = env!("CARGO_PKG_VERSION"),
    about = "A studio management CLI: clients, services, appointments, invoices and reports on SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Report fields missing from the configuration file")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "limit", help = "Only the N most recent rows")]
        limit: Option<usize>,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Zip the backup")]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing backup without asking")]
        force: bool,
    },

    /// Export a table to CSV or JSON
    Export {
        #[arg(long, value_enum, default_value = "appointments")]
        what: ExportTarget,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter appointments/invoices by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Manage clients
    #[command(subcommand)]
    Client(ClientCmd),

    /// Manage the service catalogue
    #[command(subcommand)]
    Service(ServiceCmd),

    /// Book and manage appointments
    #[command(subcommand)]
    Appt(ApptCmd),

    /// Bill appointments and manage invoices
    #[command(subcommand)]
    Invoice(InvoiceCmd),

    /// Income and activity reports
    #[command(subcommand)]
    Report(ReportCmd),

    /// Show the agenda of a day
    Agenda {
        #[arg(long, default_value = "today", help = "Day to show (YYYY-MM-DD or 'today')")]
        date: String,

        #[arg(long, help = "List free time slots instead of appointments")]
        slots: bool,

        #[arg(
            long,
            default_value_t = 30,
            help = "Length in minutes a free slot must fit (with --slots)"
        )]
        duration: i64,

        #[arg(long, help = "Keep running and redraw when appointments change")]
        watch: bool,
    },
}

/// Client form fields shared by `add` and `edit`.
#[derive(Args, Debug, Clone)]
pub struct ClientFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub neighborhood: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long, help = "Mark the client as VIP (true/false)")]
    pub vip: Option<bool>,

    #[arg(long, help = "Mark the client as active (true/false)")]
    pub active: Option<bool>,
}

#[derive(Subcommand)]
pub enum ClientCmd {
    /// Register a new client
    Add(ClientFields),

    /// Edit an existing client; omitted fields keep their value
    Edit {
        id: i64,

        #[command(flatten)]
        fields: ClientFields,
    },

    /// Show one client with their appointments and invoices
    Show { id: i64 },

    /// List clients, optionally filtered by name
    List {
        #[arg(long, short, help = "Substring of the client name")]
        search: Option<String>,
    },

    /// Delete a client without appointments or invoices
    Del { id: i64 },
}

#[derive(Args, Debug, Clone)]
pub struct ServiceFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, help = "Duration in minutes")]
    pub duration: Option<i64>,

    #[arg(long, help = "Price in whole currency units (e.g. 35000)")]
    pub price: Option<String>,

    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Subcommand)]
pub enum ServiceCmd {
    /// Add a service to the catalogue
    Add(ServiceFields),

    /// Edit a service; omitted fields keep their value
    Edit {
        id: i64,

        #[command(flatten)]
        fields: ServiceFields,
    },

    Show { id: i64 },

    /// List active services (all with --all)
    List {
        #[arg(long, short)]
        search: Option<String>,

        #[arg(long)]
        all: bool,
    },

    /// Hide a service from new bookings
    Deactivate { id: i64 },

    /// Make a deactivated service bookable again
    Activate { id: i64 },

    /// Delete a service that is not referenced anywhere
    Del { id: i64 },
}

#[derive(Subcommand)]
pub enum ApptCmd {
    /// Book an appointment
    Add {
        #[arg(long)]
        client: i64,

        #[arg(long, help = "Date (YYYY-MM-DD or 'today')")]
        date: String,

        #[arg(long = "at", help = "Start time (HH:MM)")]
        start: String,

        #[arg(long, help = "End time (HH:MM); defaults to the services' total duration")]
        end: Option<String>,

        #[arg(long = "service", help = "Service id (repeatable)")]
        services: Vec<i64>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Reschedule or re-book an appointment
    Edit {
        id: i64,

        #[arg(long)]
        client: Option<i64>,

        #[arg(long)]
        date: Option<String>,

        #[arg(long = "at")]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long = "service", help = "Replace the services (repeatable)")]
        services: Vec<i64>,

        #[arg(long, help = "Remove every service from the appointment")]
        clear_services: bool,

        #[arg(long)]
        notes: Option<String>,
    },

    Show { id: i64 },

    /// List appointments of a day or a range
    List {
        #[arg(long, conflicts_with = "range")]
        date: Option<String>,

        #[arg(long, help = "YYYY, YYYY-MM, YYYY-MM-DD or a:b")]
        range: Option<String>,

        #[arg(long)]
        client: Option<i64>,
    },

    /// Set the status (scheduled, completed, cancelled)
    Status { id: i64, status: String },

    /// Replace the services of an appointment
    Services {
        id: i64,

        #[arg(long = "service")]
        services: Vec<i64>,
    },

    Del { id: i64 },
}

#[derive(Subcommand)]
pub enum InvoiceCmd {
    /// Create an issued invoice from an appointment's services
    Generate {
        appointment: i64,

        #[arg(long, help = "Extra amount in whole currency units")]
        extra: Option<i64>,
    },

    /// Create an empty draft invoice for a client
    Add {
        #[arg(long)]
        client: i64,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Append a line to an invoice
    AddItem {
        id: i64,

        #[arg(long, help = "Unit price in whole currency units")]
        price: String,

        #[arg(long = "qty", default_value_t = 1)]
        quantity: i64,

        #[arg(long)]
        service: Option<i64>,

        #[arg(long = "desc")]
        description: Option<String>,
    },

    Show { id: i64 },

    List {
        #[arg(long)]
        client: Option<i64>,

        #[arg(long)]
        range: Option<String>,
    },

    /// Mark an invoice as paid
    Pay { id: i64 },

    /// Void an invoice
    Void { id: i64 },

    /// Set the status (draft, issued, paid, void)
    Status { id: i64, status: String },

    /// Rebuild the total from the items
    Recompute { id: i64 },
}

#[derive(Subcommand)]
pub enum ReportCmd {
    /// Appointments and income of one day
    Day {
        #[arg(long, default_value = "today")]
        date: String,
    },

    /// Monthly counters and income
    Month {
        #[arg(long, help = "Month as YYYY-MM (default: current month)")]
        month: Option<String>,
    },

    /// Booked share of the opening hours, per day of a month
    Occupancy {
        #[arg(long)]
        month: Option<String>,
    },

    /// Paid income over a range
    Paid {
        #[arg(long, help = "YYYY, YYYY-MM, YYYY-MM-DD or a:b")]
        range: String,
    },
}
