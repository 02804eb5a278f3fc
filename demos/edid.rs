#[cfg(windows)]
use {
    edid_winapi::{Backend, Config, Error, RegistryBackend, SelectorBackend},
    std::process::ExitCode,
};

#[cfg(windows)]
fn print_reports<B: Backend>(backend: &B, config: &Config) -> Result<usize, Error> {
    let mut first = true;
    edid_winapi::run_each(backend, config, |report| {
        if !first {
            println!();
        }
        first = false;
        print!("{report}");
    })
}

#[cfg(windows)]
fn main() -> ExitCode {
    env_logger::init();

    let res = match std::env::args().nth(1).as_deref() {
        None | Some("registry") => print_reports(&RegistryBackend::new(), &Config::default().key_paths(true)),
        Some("winrt") => print_reports(&SelectorBackend::new(), &Config::default()),
        Some(other) => {
            eprintln!("unknown backend {other:?}, expected \"registry\" or \"winrt\"");
            return ExitCode::from(2)
        },
    };

    match res {
        Ok(count) => {
            log::debug!("reported {count} devices");
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("ERROR! {e}");
            ExitCode::FAILURE
        },
    }
}

#[cfg(not(windows))]
fn main() {
    eprintln!("unsupported platform");
}
