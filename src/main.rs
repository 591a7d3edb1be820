use anyhow::{Context, Result};
use clap::Parser;
use linktext_rs::perf::{Listener, SpanTimings};
use linktext_rs::{parse_option_pair, AnnotationPolicy, ConvertOptions, Converter, ImageHandling};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};
use url::Url;

const USAGE_HINT: &str = "You must pass a .html file (from your working folder).";

/// Convert HTML email files to plain text, keeping link targets in brackets.
///
/// Each FILE is written to FILE.txt, overwriting any existing file.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// HTML files, relative to the working directory.
    files: Vec<PathBuf>,

    /// Annotation policy as a JSON object.
    #[arg(long, value_name = "FILE")]
    policy: Option<PathBuf>,

    /// Start from a policy that annotates every link with an href.
    #[arg(long, conflicts_with = "policy")]
    unfiltered: bool,

    /// Override one policy option, e.g. `-o delimiters="<>"`.  Repeatable.
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    options: Vec<String>,

    /// Base URL for relative links.  Defaults to the file's directory.
    #[arg(long, value_name = "URL")]
    base_url: Option<Url>,

    /// Drop images before rendering.
    #[arg(long, conflicts_with = "preserve_image_alt")]
    remove_images: bool,

    /// Replace images with `[IMAGE: <alt>]` before rendering.
    #[arg(long)]
    preserve_image_alt: bool,

    /// Report elapsed time per file and per stage.
    #[arg(long)]
    timing: bool,
}

fn build_policy(args: &Args) -> Result<AnnotationPolicy> {
    let mut policy = match (&args.policy, args.unfiltered) {
        (Some(path), _) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read policy file {}", path.display()))?;
            AnnotationPolicy::from_json(&json)
                .with_context(|| format!("invalid policy file {}", path.display()))?
        }
        (None, true) => AnnotationPolicy::unfiltered(),
        (None, false) => AnnotationPolicy::default(),
    };
    for option in &args.options {
        let (key, value) = parse_option_pair(option)?;
        policy.set_option(&key, &value)?;
    }
    Ok(policy)
}

fn image_handling(args: &Args) -> ImageHandling {
    if args.preserve_image_alt {
        ImageHandling::PreserveAlt
    } else if args.remove_images {
        ImageHandling::Remove
    } else {
        ImageHandling::Keep
    }
}

/// `inbox/mail.html` becomes `inbox/mail.html.txt`.
fn text_path_for(file: &Path) -> PathBuf {
    let mut name = OsString::from(file.as_os_str());
    name.push(".txt");
    PathBuf::from(name)
}

struct Outcome {
    output: PathBuf,
    elapsed: Duration,
    stages: Vec<(&'static str, Duration)>,
}

fn convert_file(cwd: &Path, file: &Path, args: &Args, options: &ConvertOptions) -> Result<Outcome> {
    let started = Instant::now();
    let path = cwd.join(file);
    log::info!("converting {}", path.display());

    let bytes = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let html = String::from_utf8_lossy(&bytes);

    let mut options = options.clone();
    if options.base_url.is_none() {
        options.base_url = path.parent().and_then(|dir| Url::from_directory_path(dir).ok());
    }

    let timings = Rc::new(SpanTimings::default());
    let listeners = if args.timing {
        vec![Listener::new(timings.clone())]
    } else {
        vec![]
    };
    let text = Converter::with_listeners(&html, options, listeners).convert();

    let output = text_path_for(file);
    let output_path = cwd.join(&output);
    fs::write(&output_path, text)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    Ok(Outcome {
        output,
        elapsed: started.elapsed(),
        stages: timings.take(),
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.files.is_empty() {
        println!("{USAGE_HINT}");
        return Ok(());
    }

    let options = ConvertOptions {
        policy: build_policy(&args)?,
        base_url: args.base_url.clone(),
        images: image_handling(&args),
    };
    let cwd = std::env::current_dir().context("cannot determine the working directory")?;

    let started = Instant::now();
    for file in &args.files {
        let outcome = convert_file(&cwd, file, &args, &options)?;
        println!("created file: {}", outcome.output.display());
        if args.timing {
            println!(
                "processed {} in {:.3} seconds",
                file.display(),
                outcome.elapsed.as_secs_f64()
            );
            for (stage, duration) in &outcome.stages {
                println!("  {stage}: {:.6} seconds", duration.as_secs_f64());
            }
        }
    }

    if args.timing && args.files.len() > 1 {
        let total = started.elapsed().as_secs_f64();
        println!(
            "Processed {} files in {:.3} seconds for an average of {:.3} seconds per file.",
            args.files.len(),
            total,
            total / args.files.len() as f64
        );
    }
    Ok(())
}
