use std::env;
use std::fs;
use std::process;

use ceol::{set_tempo, GenerationResponse, VariationClient, DEFAULT_TEMPO, KNOWN_STYLES};

const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";

fn usage() -> ! {
    eprintln!("Usage: ceol tempo <input.abc> [bpm]");
    eprintln!("       ceol melodic <input.abc> <melodic_type> [lick]");
    eprintln!("       ceol harmony <input.abc> <harmony_type>");
    eprintln!("       ceol combined <input.abc> <harmony_type> <melodic_type> [lick]");
    eprintln!("       ceol styles <input.abc> <style> [style...]");
    eprintln!("       ceol lucky <input.abc>");
    eprintln!("       ceol session <url>");
    eprintln!();
    eprintln!("Service URL is read from CEOL_SERVICE_URL (default {DEFAULT_SERVICE_URL}).");
    process::exit(1);
}

fn read_source(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path, e);
            process::exit(1);
        }
    }
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create runtime: {}", e);
            process::exit(1);
        }
    };
    rt.block_on(future)
}

/// Print the named variation when the response carries it, otherwise the
/// whole response object.
fn print_response(response: &GenerationResponse, variation: Option<&str>) {
    if let Some(abc) = variation.and_then(|id| response.variation(id)) {
        println!("{}", abc);
        return;
    }
    match serde_json::to_string_pretty(response.raw()) {
        Ok(body) => println!("{}", body),
        Err(e) => {
            eprintln!("Error formatting response: {}", e);
            process::exit(1);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        usage();
    }

    // Tempo rewriting is offline; everything else talks to the service.
    if args[1] == "tempo" {
        let source = read_source(&args[2]);
        let tempo = match args.get(3) {
            Some(raw) => match raw.parse::<u32>() {
                Ok(bpm) if bpm > 0 => bpm,
                _ => {
                    eprintln!("Invalid tempo '{}', expected a positive integer", raw);
                    process::exit(1);
                }
            },
            None => DEFAULT_TEMPO,
        };
        print!("{}", set_tempo(&source, tempo));
        return;
    }

    let base_url =
        env::var("CEOL_SERVICE_URL").unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string());
    let client = match VariationClient::new(&base_url) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error creating client: {}", e);
            process::exit(1);
        }
    };

    let (result, variation) = match args[1].as_str() {
        "melodic" => {
            if args.len() < 4 {
                usage();
            }
            let source = read_source(&args[2]);
            let lick = args.get(4).map(String::as_str);
            (
                block_on(client.melodic_variation(&source, &args[3], lick)),
                Some("melodic"),
            )
        }
        "harmony" => {
            if args.len() < 4 {
                usage();
            }
            let source = read_source(&args[2]);
            (
                block_on(client.harmony_variation(&source, &args[3])),
                Some("harmony"),
            )
        }
        "combined" => {
            if args.len() < 5 {
                usage();
            }
            let source = read_source(&args[2]);
            let lick = args.get(5).map(String::as_str);
            (
                block_on(client.combined_variation(&source, &args[3], &args[4], lick)),
                Some("combined"),
            )
        }
        "styles" => {
            if args.len() < 4 {
                usage();
            }
            let source = read_source(&args[2]);
            let styles: Vec<String> = args[3..].to_vec();
            for style in &styles {
                if !KNOWN_STYLES.contains(&style.as_str()) {
                    eprintln!("Warning: unknown style '{}'", style);
                }
            }
            (block_on(client.transform_styles(&source, &styles)), None)
        }
        "lucky" => {
            let source = read_source(&args[2]);
            (block_on(client.feeling_lucky(&source)), None)
        }
        "session" => (block_on(client.analyze_session(&args[2])), None),
        _ => usage(),
    };

    match result {
        Ok(response) => {
            if let Some(message) = response.service_error() {
                eprintln!("Service error: {}", message);
                process::exit(1);
            }
            print_response(&response, variation);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
