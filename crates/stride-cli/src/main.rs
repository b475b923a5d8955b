use std::env;
use std::process;

use stride_cli::ReplayProcessor;
use stride_engine::SessionConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args();
    let _bin = args.next();
    let Some(recording) = args.next() else {
        eprintln!("usage: stride-cli <recording.csv> [report.json]");
        process::exit(2);
    };
    let report_path = args.next();

    let mut processor = ReplayProcessor::new(SessionConfig::default());
    match processor.process_recording(&recording) {
        Ok(report) => {
            println!("recording: {}", report.metadata.recording_file);
            println!("samples: {}", report.metadata.sample_count);
            println!("duration (s): {:.3}", report.metadata.duration_seconds);
            println!("steps: {}", report.summary.steps);
            println!("intervals accepted: {}", report.summary.recorded_intervals);
            println!("cadence (steps/min): {}", report.summary.final_cadence_spm);
            println!("symmetry: {}", report.summary.final_symmetry);
            if report.summary.dropped_samples > 0 {
                println!("dropped samples: {}", report.summary.dropped_samples);
            }

            if let Some(path) = report_path {
                match report.write_json(&path) {
                    Ok(()) => println!("report written to {path}"),
                    Err(err) => {
                        eprintln!("failed to write report: {err}");
                        process::exit(1);
                    }
                }
            }
        }
        Err(err) => {
            eprintln!("replay failed: {err}");
            process::exit(1);
        }
    }
}
