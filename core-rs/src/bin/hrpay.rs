//! hrpay - HR/payroll console CLI
//!
//! Terminal shell over the console core: login, role-gated menu and backend calls

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use hrpay_core::api::{EmployeeStat, UserStat, ViewScope};
use hrpay_core::config::{AppConfig, CONFIG_FILE_NAME};
use hrpay_core::modal::{ModalId, ModalKind, ModalPresenter, ModalView, NoScrollLock};
use hrpay_core::rbac::permission_table as perms;
use hrpay_core::{
    AlertOutcome, ConfirmConfig, Console, ConsoleError, CtcEntry, FileStorage, LoginForm,
    ModalResponse, NewEmployee, NewUser, PayslipRequest, Role, RouteDecision, Variant,
};

const PASSWORD_ENV: &str = "HRPAY_PASSWORD";

#[derive(Parser)]
#[command(name = "hrpay")]
#[command(version)]
#[command(about = "HR/payroll administration console", long_about = None)]
struct Cli {
    /// Config file
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,
    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and start a session
    Login {
        #[arg(long, short)]
        username: String,
        /// Password (falls back to $HRPAY_PASSWORD, then a prompt)
        #[arg(long, short)]
        password: Option<String>,
    },
    /// End the session
    Logout {
        /// Skip the confirmation
        #[arg(long, short)]
        yes: bool,
    },
    /// Show the logged-in identity, role and permissions
    Whoami,
    /// Show the menu entries available to the current role
    Menu,
    /// Check whether the current session may open a route
    Guard {
        /// Route path (e.g., /users/create)
        path: String,
    },
    /// Console accounts (list, create)
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Employees (list, onboard)
    Employees {
        #[command(subcommand)]
        command: EmployeeCommands,
    },
    /// Cost-to-company entries
    Ctc {
        #[command(subcommand)]
        command: CtcCommands,
    },
    /// Payslips (list, generate)
    Payslips {
        #[command(subcommand)]
        command: PayslipCommands,
    },
    /// Dashboard statistics
    Stats,
}

#[derive(Subcommand)]
enum UserCommands {
    /// List console accounts
    List,
    /// Create a console account
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        /// ADMIN, HR or MANAGER
        #[arg(long, default_value = "HR")]
        role: String,
        /// Use the admin creation endpoint
        #[arg(long)]
        admin: bool,
    },
}

#[derive(Subcommand)]
enum EmployeeCommands {
    /// List employees
    List,
    /// Onboard a new employee
    Onboard {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        department: String,
        #[arg(long)]
        designation: String,
        /// Joining date (YYYY-MM-DD)
        #[arg(long)]
        joined: String,
    },
}

#[derive(Subcommand)]
enum CtcCommands {
    /// Record CTC components for an employee
    Add {
        #[arg(long)]
        employee: String,
        #[arg(long)]
        basic: f64,
        #[arg(long, default_value_t = 0.0)]
        hra: f64,
        #[arg(long, default_value_t = 0.0)]
        allowances: f64,
        #[arg(long, default_value_t = 0.0)]
        deductions: f64,
        /// Effective date (YYYY-MM-DD)
        #[arg(long)]
        from: String,
    },
}

#[derive(Subcommand)]
enum PayslipCommands {
    /// List payslips
    List,
    /// Generate a payslip for one employee and month
    Generate {
        #[arg(long)]
        employee: String,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        /// Skip the confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

/// Prints dialogs to the terminal. Answers are read by the command that asked.
struct TerminalPresenter;

impl ModalPresenter for TerminalPresenter {
    fn present(&self, view: &ModalView) {
        let title = match view.variant {
            Variant::Info => view.title.blue().bold(),
            Variant::Success => view.title.green().bold(),
            Variant::Warning => view.title.yellow().bold(),
            Variant::Danger => view.title.red().bold(),
        };
        println!("\n{}", title);
        if !view.message.is_empty() {
            println!("  {}", view.message);
        }
        if view.kind == ModalKind::Confirm {
            let confirm = view.buttons.first().map(String::as_str).unwrap_or("Confirm");
            print!("  {} [y/N]: ", confirm);
            let _ = io::stdout().flush();
        }
    }

    fn close(&self, _id: ModalId) {}
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ConsoleError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ConsoleError::Validation(format!("{} must be a date like 2024-04-01, got '{}'", field, value))
    })
}

fn read_line() -> String {
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
    line.trim().to_string()
}

/// Ask for confirmation through the modal manager. `--yes` answers up front,
/// so no dialog is shown.
async fn ask(console: &Console, config: ConfirmConfig, assume_yes: bool) -> bool {
    if assume_yes {
        tracing::debug!(title = %config.title, "confirmation given on the command line");
        return true;
    }

    let response = console.modals().show_confirm(config);
    let id = response.id();
    let answer = matches!(read_line().to_lowercase().as_str(), "y" | "yes");
    if answer {
        console.modals().confirm(id);
    } else {
        console.modals().cancel(id);
    }
    response.await
}

/// Terminal alerts are printed once and closed right away.
async fn acknowledge(console: &Console, response: ModalResponse<AlertOutcome>) {
    console.modals().dismiss(response.id());
    response.await;
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}

fn print_list(items: &[serde_json::Value], what: &str) {
    if items.is_empty() {
        println!("No {} found", what);
        return;
    }
    for item in items {
        print_json(item);
    }
    println!("\n{} {}", items.len(), what);
}

async fn run(console: &Console, command: Commands) -> Result<(), ConsoleError> {
    match command {
        Commands::Login { username, password } => {
            let password = match password.or_else(|| std::env::var(PASSWORD_ENV).ok()) {
                Some(password) => password,
                None => {
                    print!("Password: ");
                    let _ = io::stdout().flush();
                    read_line()
                }
            };

            let session = console.api().login(&LoginForm { username, password }).await?;
            let access = console.access();
            let name = session.claims.as_ref().map(|c| c.display_name().to_string()).unwrap_or_default();
            let landing = access.dashboard_path()?;
            acknowledge(console, console.notify("Logged in", format!("Welcome, {} ({})", name, landing))).await;
        }

        Commands::Logout { yes } => {
            if !console.session().is_authenticated {
                println!("Not logged in");
                return Ok(());
            }
            let config = ConfirmConfig::new("Log out", "End the current session?").buttons("Log out", "Stay");
            if ask(console, config, yes).await {
                console.session_store().logout()?;
                println!("✓ Logged out");
            }
        }

        Commands::Whoami => {
            let access = console.access();
            let claims = match &access.session().claims {
                Some(claims) => claims.clone(),
                None => {
                    println!("Not logged in");
                    return Ok(());
                }
            };

            println!("User:        {}", claims.display_name());
            if let Some(email) = &claims.email {
                println!("Email:       {}", email);
            }
            println!("Role:        {}", claims.role.as_deref().unwrap_or("-"));
            match access.dashboard_path() {
                Ok(path) => println!("Dashboard:   {}", path),
                Err(e) => println!("Dashboard:   {}", e.to_string().red()),
            }
            println!("Permissions: {}", access.permissions().join(", "));
            if let Some(expires) = claims.expires_at() {
                println!("Expires:     {}", expires.to_rfc3339());
            }
        }

        Commands::Menu => {
            let access = console.access();
            if !access.session().is_authenticated {
                return Err(ConsoleError::Auth("not logged in".to_string()));
            }
            println!("{}", access.dashboard_path()?.bold());
            for item in access.visible_menu() {
                println!("  {:<20} {}", item.label, item.path.dimmed());
            }
        }

        Commands::Guard { path } => match console.access().guard_route(&path) {
            RouteDecision::Allow => println!("✓ {} allowed", path),
            RouteDecision::RedirectToLogin => println!("→ {} requires login", path),
            RouteDecision::Forbidden { fallback } => {
                println!("✗ {} forbidden, redirect to {}", path, fallback)
            }
        },

        Commands::Users { command } => match command {
            UserCommands::List => {
                console.require_permission(perms::USERS_VIEW)?;
                let users = console.api().list_users().await?;
                print_list(&users, "users");
            }
            UserCommands::Create { username, email, password, confirm_password, role, admin } => {
                let tag = if admin { perms::USERS_CREATE_ADMIN } else { perms::USERS_CREATE };
                console.require_permission(tag)?;
                let user = NewUser { username, email, password, confirm_password, role: role.parse::<Role>()? };
                let created = if admin {
                    console.api().create_admin_user(&user).await?
                } else {
                    console.api().create_user(&user).await?
                };
                print_json(&created);
                acknowledge(console, console.notify("User created", format!("{} ({})", user.username, user.role))).await;
            }
        },

        Commands::Employees { command } => match command {
            EmployeeCommands::List => {
                console.require_permission(perms::EMPLOYEES_VIEW)?;
                let employees = console.api().list_employees().await?;
                print_list(&employees, "employees");
            }
            EmployeeCommands::Onboard { first_name, last_name, email, phone, department, designation, joined } => {
                console.require_permission(perms::EMPLOYEES_ONBOARD)?;
                let employee = NewEmployee {
                    first_name,
                    last_name,
                    email,
                    phone,
                    department,
                    designation,
                    date_of_joining: parse_date("joined", &joined)?,
                };
                let created = console.api().onboard_employee(&employee).await?;
                print_json(&created);
                acknowledge(console, console.notify("Employee onboarded", employee.email.clone())).await;
            }
        },

        Commands::Ctc { command } => match command {
            CtcCommands::Add { employee, basic, hra, allowances, deductions, from } => {
                console.require_permission(perms::CTC_MANAGE)?;
                let entry = CtcEntry {
                    employee_id: employee,
                    basic_salary: basic,
                    hra,
                    allowances,
                    deductions,
                    effective_from: parse_date("from", &from)?,
                };
                let saved = console.api().add_ctc(&entry).await?;
                print_json(&saved);
                acknowledge(console, console.notify("CTC saved", entry.employee_id.clone())).await;
            }
        },

        Commands::Payslips { command } => match command {
            PayslipCommands::List => {
                console.require_permission(perms::PAYSLIPS_VIEW)?;
                let payslips = console.api().list_payslips().await?;
                print_list(&payslips, "payslips");
            }
            PayslipCommands::Generate { employee, month, year, yes } => {
                console.require_permission(perms::PAYSLIPS_GENERATE)?;
                let request = PayslipRequest { employee_id: employee, month, year };
                request.validate()?;

                let config = ConfirmConfig::new(
                    "Generate payslip",
                    format!("Generate the {:02}/{} payslip for {}?", month, year, request.employee_id),
                )
                .buttons("Generate", "Cancel");
                if !ask(console, config, yes).await {
                    println!("Cancelled");
                    return Ok(());
                }

                let generated = console.api().generate_payslips(&request).await?;
                print_json(&generated);
            }
        },

        Commands::Stats => {
            console.require_permission(perms::STATS_VIEW)?;
            let api = console.api();
            let scope = ViewScope::new();

            let stats = scope
                .run(async {
                    tokio::try_join!(
                        api.user_stat(UserStat::Total),
                        api.user_stat(UserStat::Hr),
                        api.user_stat(UserStat::Managers),
                        api.employee_stat(EmployeeStat::Total),
                        api.employee_stat(EmployeeStat::Active),
                        api.employee_stat(EmployeeStat::Inactive),
                        api.payroll_stats(),
                    )
                })
                .await;

            let (users, hr, managers, employees, active, inactive, payroll) = match stats {
                Some(result) => result?,
                None => return Ok(()),
            };

            println!("{}", "Users".bold());
            println!("  Total:     {}", users);
            println!("  HR:        {}", hr);
            println!("  Managers:  {}", managers);
            println!("{}", "Employees".bold());
            println!("  Total:     {}", employees);
            println!("  Active:    {}", active);
            println!("  Inactive:  {}", inactive);
            println!("{}", "Payroll".bold());
            print_json(&payroll);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let config = AppConfig::load_or_default(&cli.config)?;
    let base = std::env::current_dir()?;
    let storage = Arc::new(FileStorage::new(config.session_dir(&base)));

    let console = Console::start(config, storage, Arc::new(TerminalPresenter), Arc::new(NoScrollLock))?;

    let logging_in = matches!(cli.command, Commands::Login { .. });
    let outcome = run(&console, cli.command).await;
    let failed = match outcome {
        Ok(()) => false,
        Err(e) => {
            acknowledge(&console, console.report(&e)).await;
            if e.requires_login() && !logging_in {
                eprintln!("Run 'hrpay login --username <name>' to start a new session");
            }
            true
        }
    };

    console.modals().shutdown();
    if failed {
        std::process::exit(1);
    }
    Ok(())
}
