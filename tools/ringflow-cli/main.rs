use clap::{Args, Parser, Subcommand};
use ringflow::prelude::*;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Compile call flows into voice-response documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Optional path to a compiler options JSON file
    #[arg(long, global = true)]
    options: Option<String>,

    /// Indent the rendered document
    #[arg(long, global = true)]
    pretty: bool,

    /// Map an editor block type onto a built-in one, e.g. `message=say`
    #[arg(long = "type-mapping", global = true, value_parser = parse_mapping)]
    type_mappings: Vec<(String, String)>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a flow for an inbound call and print the response
    Compile {
        /// Path to the flow definition JSON file
        flow_path: String,
        #[command(flatten)]
        call: CallArgs,
        /// Save the compiled script (bincode) to this path
        #[arg(long)]
        save: Option<String>,
        /// Print the traversal trace to stderr
        #[arg(long)]
        trace: bool,
    },
    /// Continue a flow after the caller answered a gather block
    Resume {
        /// Path to the flow definition JSON file
        flow_path: String,
        /// Id of the gather block that collected the input
        #[arg(long)]
        block: String,
        /// Digits the caller pressed
        #[arg(long)]
        digits: String,
        #[command(flatten)]
        call: CallArgs,
    },
    /// Render a previously saved compiled script
    Render {
        /// Path to a script written by `compile --save`
        script_path: String,
        #[command(flatten)]
        call: CallArgs,
    },
}

#[derive(Args, Debug)]
struct CallArgs {
    #[arg(long, default_value = "+15550000001")]
    caller: String,
    #[arg(long, default_value = "+15550000002")]
    called: String,
    #[arg(long, default_value = "CA00000000000000000000000000000000")]
    call_sid: String,
    #[arg(long, default_value = "http://localhost:3000/api/voice")]
    callback_base: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ringflow=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let envelope = ResponseEnvelope::new(build_compiler(&cli));

    match cli.command {
        Command::Compile {
            flow_path,
            call,
            save,
            trace,
        } => {
            let context = build_context(&call);
            let flow_json = read_file(&flow_path);

            let start = Instant::now();
            let response = envelope.respond(Some(flow_json.as_str()), &context);
            let elapsed = start.elapsed();

            println!("{}", response.body);
            eprintln!("Outcome: {:?} in {:?}", response.outcome, elapsed);

            if let Some(script) = &response.script {
                if trace {
                    eprintln!("Trace: {}", TraceFormatter::format_script(script));
                }
                if let Some(path) = save {
                    script
                        .save(&path)
                        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
                    eprintln!("Saved compiled script to '{}'", path);
                }
            } else if save.is_some() {
                eprintln!("Nothing compiled, no script saved");
            }
        }
        Command::Resume {
            flow_path,
            block,
            digits,
            call,
        } => {
            let context = build_context(&call);
            let flow_json = read_file(&flow_path);
            let response = envelope.respond_to_input(flow_json.as_str(), &block, &digits, &context);
            println!("{}", response.body);
            eprintln!("Outcome: {:?}", response.outcome);
        }
        Command::Render { script_path, call } => {
            let context = build_context(&call);
            let script = CompiledScript::from_file(&script_path)
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            let body = envelope
                .render(&script, &context)
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            println!("{}", body);
        }
    }
}

fn build_compiler(cli: &Cli) -> Compiler {
    let mut options = match &cli.options {
        Some(path) => {
            CompilerOptions::from_file(path).unwrap_or_else(|e| exit_with_error(&e.to_string()))
        }
        None => CompilerOptions::default(),
    };
    options.pretty |= cli.pretty;

    cli.type_mappings
        .iter()
        .fold(Compiler::builder().with_options(options), |builder, (user, builtin)| {
            builder.with_type_mapping(user, builtin)
        })
        .build()
}

fn build_context(call: &CallArgs) -> CallContext {
    CallContext::new(&call.caller, &call.called, &call.call_sid, &call.callback_base)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()))
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", path, e)))
}

fn parse_mapping(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(user, builtin)| (user.trim().to_string(), builtin.trim().to_string()))
        .ok_or_else(|| format!("expected USER=BUILTIN, got '{}'", raw))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
