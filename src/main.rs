//!
//! inspector_console binary
//! -------------------------
//! Interactive console for the inspector dashboard API. Probes the current
//! session on start, then lets the user sign in, browse the guarded pages and
//! sign out. Every command prints the screen the dashboard would show.

use std::env;
use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use inspector_console::api::HttpAuthApi;
use inspector_console::config::{has_flag, ConsoleConfig};
use inspector_console::console::{Console, Screen};
use inspector_console::identity::{AuthState, Credentials};
use inspector_console::logging;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--api <url>] [--probe-timeout-ms N] [--probe-retries N] [--login-timeout-ms N] [--log <level>]\n\nFlags:\n  --api <url>              REST API root (env: INSPECTOR_API_BASE, default http://127.0.0.1:8000/api/v1/)\n  --probe-timeout-ms N     Upper bound for the startup session check (env: INSPECTOR_PROBE_TIMEOUT_MS, default 10000)\n  --probe-retries N        Extra attempts after a network failure (env: INSPECTOR_PROBE_RETRIES, default 1)\n  --login-timeout-ms N     Upper bound for one sign-in request (env: INSPECTOR_LOGIN_TIMEOUT_MS, default 30000)\n  --log <level>            Log filter when RUST_LOG is unset (env: INSPECTOR_LOG, default info)\n  -h, --help               Show this help\n\nInteractive commands:\n  login <user> <password>  sign in\n  logout                   sign out\n  open <path>              go to a page (/, /apartments, /citizens, /services)\n  back                     go back one page\n  menu                     show the sidebar entries you can see\n  whoami                   show the signed-in inspector\n  status                   show session state and current path\n  help                     show this help\n  quit | exit              leave the console"
    );
}

fn print_screen(screen: &Screen, path: &str) {
    match screen {
        Screen::Loading => println!("[{}] loading...", path),
        Screen::Page(page) => println!("[{}] {}", path, page.title()),
        Screen::NotFound(p) => println!("[{}] page not found", p),
        Screen::Blank => println!("[{}] (nothing to show)", path),
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        print_usage("inspector_console");
        return Ok(());
    }

    let cfg = ConsoleConfig::load(&args)?;
    logging::init(&cfg.log_level);
    info!(
        target: "console",
        "inspector_console starting: api_base={}, probe_timeout_ms={}, probe_retries={}",
        cfg.api_base, cfg.probe_timeout.as_millis(), cfg.probe_retries
    );

    let api = HttpAuthApi::new(&cfg.api_base, &cfg.me_endpoint, &cfg.login_endpoint)
        .with_context(|| format!("While building the API client for {}", cfg.api_base))?;
    let rt = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let mut console = Console::new(api, &cfg);

    print_screen(&console.render(), &console.current_path());
    let outcome = rt.block_on(console.start());
    info!(target: "console", ?outcome, "session check finished");
    print_screen(&console.render(), &console.current_path());

    run_repl(&rt, &mut console, &cfg)
}

fn run_repl(rt: &tokio::runtime::Runtime, console: &mut Console<HttpAuthApi>, cfg: &ConsoleConfig) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut input = String::new();
    println!("inspector console. Type 'help' for commands.");
    loop {
        input.clear();
        print!("> ");
        let _ = stdout.flush();
        match stdin.read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = input.trim();
        if line.is_empty() { continue; }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts[0].to_ascii_lowercase();
        match cmd.as_str() {
            "quit" | "exit" => break,
            "help" => { print_usage("inspector_console"); continue; }
            "login" => {
                if parts.len() < 3 { eprintln!("usage: login <user> <password>"); continue; }
                let creds = Credentials::new(parts[1], parts[2]);
                match rt.block_on(console.login(&creds)) {
                    Ok(id) => println!("signed in as {} ({})", id.display_name(), id.role),
                    Err(e) if e.is_user_facing() => eprintln!("sign-in failed: {}", e.message()),
                    Err(e) => eprintln!("sign-in failed: {}", e),
                }
            }
            "logout" => console.logout(),
            "open" => {
                if parts.len() < 2 { eprintln!("usage: open <path>"); continue; }
                console.open(parts[1]);
            }
            "back" => {
                if console.back().is_none() { println!("no earlier page"); }
            }
            "menu" => {
                let groups = console.menu();
                if groups.is_empty() { println!("(no menu entries)"); }
                for g in groups {
                    println!("{}", g.title);
                    for item in g.items { println!("  {:<12} {}", item.label, item.url); }
                }
                continue;
            }
            "whoami" => {
                match console.store().current_identity() {
                    Some(id) => {
                        println!("{} (id {}, role {})", id.display_name(), id.id, id.role);
                        if let Some(day) = id.birthday_date() { println!("  born     {}", day.format("%d.%m.%Y")); }
                        if !id.position.is_empty() { println!("  position {}", id.position); }
                        if !id.rank.is_empty() { println!("  rank     {}", id.rank); }
                        if let Some(v) = &id.village { println!("  village  {}", v.name); }
                        if let Some(url) = id.photo_url(&cfg.server_origin()) { println!("  photo    {}", url); }
                    }
                    None => println!("not signed in"),
                }
                continue;
            }
            "status" => {
                let snap = console.store().snapshot();
                let who = match &snap.auth {
                    AuthState::Authenticated(id) => format!("authenticated as {}", id.username),
                    other => other.label().to_string(),
                };
                println!("session: {}, path: {}", who, console.current_path());
                continue;
            }
            other => { eprintln!("unknown command: {} (try 'help')", other); continue; }
        }
        let screen = console.render();
        print_screen(&screen, &console.current_path());
    }
    Ok(())
}
