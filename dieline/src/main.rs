mod export;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use dieline_core::logo::Logo;
use dieline_core::params::{FormValue, parse_dimension};
use dieline_core::{
    BoxParameters, BoxRequest, DerivedQuantities, Language, Orientation, RenderOptions,
    SegmentTable, card_template_svg, download_filename, render_box,
};
use tracing_subscriber::EnvFilter;

use crate::export::{Format, write_output};

#[derive(Parser, Debug)]
#[command(name = "dieline", version, about = "Cut and fold dielines for rigid set-up boxes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw the box net and export it as PDF, SVG or PNG
    Box(BoxArgs),
    /// Print the derived construction quantities as JSON
    Derive(InputArgs),
    /// Draw a bleed and safe-area template for a flat card
    Card(CardArgs),
    /// Convert a PackLib segment listing to a JSON segment table
    Table(TableArgs),
}

/// The five box measurements, from flags or from a form dump.
#[derive(Args, Debug)]
struct InputArgs {
    /// Length L (mm)
    #[arg(short = 'l', long = "length", value_parser = parse_dimension)]
    l: Option<f64>,
    /// Width B (mm)
    #[arg(short = 'b', long = "width", value_parser = parse_dimension)]
    b: Option<f64>,
    /// Height H (mm)
    #[arg(short = 'H', long = "height", value_parser = parse_dimension)]
    h: Option<f64>,
    /// Corner radius R (mm)
    #[arg(short = 'r', long = "radius", value_parser = parse_dimension)]
    r: Option<f64>,
    /// Board thickness (mm)
    #[arg(short = 'e', long = "ep", value_parser = parse_dimension)]
    ep: Option<f64>,
    /// JSON object of raw form fields: L, B, H, R and ep (or ep1)
    #[arg(long, conflicts_with_all = ["l", "b", "h", "r", "ep"])]
    request: Option<PathBuf>,
}

impl InputArgs {
    fn params(&self) -> Result<BoxParameters, Box<dyn Error>> {
        let req = match &self.request {
            Some(path) => BoxRequest::from_json(&fs::read_to_string(path)?)?,
            None => BoxRequest {
                l: self.l.map(FormValue::Number),
                b: self.b.map(FormValue::Number),
                h: self.h.map(FormValue::Number),
                r: self.r.map(FormValue::Number),
                ep: self.ep.map(FormValue::Number),
            },
        };
        Ok(req.into_params()?)
    }
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output file; the extension picks the format unless --format is given
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(long, value_enum)]
    format: Option<Format>,
    /// Font file used for text (mapped to sans-serif)
    #[arg(long)]
    font: Option<PathBuf>,
    /// Resolution of PNG output
    #[arg(long, default_value_t = 4.0)]
    px_per_mm: f32,
}

impl OutputArgs {
    /// Explicit format, else the output extension, else PDF; a missing
    /// output name falls back to `default_name` with the matching extension.
    fn resolve(&self, default_name: &str) -> (PathBuf, Format) {
        let format = self
            .format
            .or_else(|| self.output.as_deref().and_then(Format::from_path))
            .unwrap_or(Format::Pdf);
        let path = match &self.output {
            Some(p) => p.clone(),
            None => Path::new(default_name).with_extension(format.extension()),
        };
        (path, format)
    }

    fn write(&self, svg: &str, default_name: &str) -> Result<(), Box<dyn Error>> {
        let (path, format) = self.resolve(default_name);
        write_output(svg, format, &path, self.font.as_deref(), self.px_per_mm)
    }
}

#[derive(Args, Debug)]
struct BoxArgs {
    #[command(flatten)]
    input: InputArgs,
    #[command(flatten)]
    out: OutputArgs,
    /// Leave out the dimension label
    #[arg(long)]
    no_label: bool,
    /// PNG logo placed top right
    #[arg(long, env = "DIELINE_LOGO")]
    logo: Option<PathBuf>,
    /// Label language (en, pl); unknown tags fall back to English
    #[arg(long)]
    lang: Option<String>,
    /// Keep the net as constructed instead of turning it upright
    #[arg(long)]
    landscape: bool,
    /// JSON render options; flags override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON segment table to use instead of the built-in one
    #[arg(long)]
    table: Option<PathBuf>,
}

impl BoxArgs {
    fn render_options(&self) -> Result<RenderOptions, Box<dyn Error>> {
        let mut opts = match &self.config {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
            None => RenderOptions::default(),
        };
        if self.no_label {
            opts.label = false;
        }
        if let Some(logo) = &self.logo {
            opts.logo = Some(logo.clone());
        }
        if let Some(tag) = &self.lang {
            opts.language = Language::from_tag(tag);
        }
        if self.landscape {
            opts.orientation = Orientation::Landscape;
        }
        Ok(opts)
    }
}

#[derive(Args, Debug)]
struct CardArgs {
    /// Card width (mm)
    #[arg(value_parser = parse_dimension)]
    width: f64,
    /// Card height (mm)
    #[arg(value_parser = parse_dimension)]
    height: f64,
    /// Language of the legend (en, pl)
    lang: Option<String>,
    #[command(flatten)]
    out: OutputArgs,
    /// PNG logo; a crossed placeholder is drawn without one
    #[arg(long, env = "DIELINE_LOGO")]
    logo: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TableArgs {
    /// PackLib listing (`x0 = ...;` assignments and `AddSegment` calls)
    listing: PathBuf,
    /// Where to write the JSON table; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn run_box(args: &BoxArgs) -> Result<(), Box<dyn Error>> {
    let params = args.input.params()?;
    let opts = args.render_options()?;
    let custom;
    let table = match &args.table {
        Some(path) => {
            custom = SegmentTable::from_json(&fs::read_to_string(path)?)?;
            &custom
        }
        None => SegmentTable::builtin()?,
    };
    let drawing = render_box(&params, &opts, table)?;
    tracing::info!(
        cut = drawing.cut.len(),
        fold = drawing.fold.len(),
        width_mm = drawing.width_mm,
        height_mm = drawing.height_mm,
        "rendered box net"
    );
    args.out.write(&drawing.to_svg(), &download_filename(&params))
}

fn run_derive(args: &InputArgs) -> Result<(), Box<dyn Error>> {
    let params = args.params()?;
    let q = DerivedQuantities::from_params(&params);
    println!("{}", serde_json::to_string_pretty(&q)?);
    Ok(())
}

fn run_card(args: &CardArgs) -> Result<(), Box<dyn Error>> {
    let lang = args.lang.as_deref().map(Language::from_tag).unwrap_or_default();
    let logo = args.logo.as_deref().and_then(Logo::load);
    let card = card_template_svg(args.width, args.height, lang, logo.as_ref())?;
    tracing::info!(title = %card.title, "built card template");
    args.out.write(&card.svg, &card.filename)
}

fn run_table(args: &TableArgs) -> Result<(), Box<dyn Error>> {
    let src = fs::read_to_string(&args.listing)?;
    let table = SegmentTable::from_listing(&src)?;
    let json = table.to_json()?;
    tracing::info!(
        segments = table.len(),
        cut = table.count(dieline_core::SegmentKind::Cut),
        fold = table.count(dieline_core::SegmentKind::Fold),
        "parsed listing"
    );
    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            tracing::info!(path = %path.display(), "wrote segment table");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Box(args) => run_box(args),
        Command::Derive(args) => run_derive(args),
        Command::Card(args) => run_card(args),
        Command::Table(args) => run_table(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_build_parameters() {
        let cli = Cli::try_parse_from([
            "dieline", "box", "-l", "100", "-b", "80", "-H", "40", "-r", "5", "-e", "1.5",
        ])
        .unwrap();
        let Command::Box(args) = cli.command else {
            panic!("expected box");
        };
        assert_eq!(
            args.input.params().unwrap(),
            BoxParameters::new(100.0, 80.0, 40.0, 5.0, 1.5).unwrap()
        );
        let (path, format) = args.out.resolve(&download_filename(&args.input.params().unwrap()));
        assert_eq!(path, PathBuf::from("box_100x80x40_ep1.5.pdf"));
        assert_eq!(format, Format::Pdf);
    }

    #[test]
    fn non_numeric_dimension_is_rejected_by_the_parser() {
        let err = Cli::try_parse_from(["dieline", "derive", "-l", "abc"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(Cli::try_parse_from(["dieline", "derive", "-l", "-3"]).is_err());
    }

    #[test]
    fn missing_dimension_is_reported_by_field() {
        let cli = Cli::try_parse_from(["dieline", "derive", "-l", "100", "-b", "80"]).unwrap();
        let Command::Derive(args) = cli.command else {
            panic!("expected derive");
        };
        let err = args.params().unwrap_err().to_string();
        assert!(err.contains("H"), "{err}");
    }

    #[test]
    fn request_file_and_flags_layer_over_config() {
        let dir = tempfile::tempdir().unwrap();
        let req = dir.path().join("form.json");
        fs::write(&req, r#"{"L":"120","B":"90","H":"35","R":"8","ep1":"2"}"#).unwrap();
        let cfg = dir.path().join("render.json");
        fs::write(&cfg, r#"{"label":false,"language":"pl","page":{"width_mm":297,"height_mm":420}}"#)
            .unwrap();
        let cli = Cli::try_parse_from([
            "dieline",
            "box",
            "--request",
            req.to_str().unwrap(),
            "--config",
            cfg.to_str().unwrap(),
            "--lang",
            "xx",
            "--landscape",
            "-o",
            "net.svg",
        ])
        .unwrap();
        let Command::Box(args) = cli.command else {
            panic!("expected box");
        };
        assert_eq!(args.input.params().unwrap().ep, 2.0);
        let opts = args.render_options().unwrap();
        assert!(!opts.label);
        assert_eq!(opts.language, Language::En);
        assert_eq!(opts.page.height_mm, 420.0);
        assert_eq!(opts.orientation, Orientation::Landscape);
        assert_eq!(args.out.resolve("ignored").1, Format::Svg);
    }

    #[test]
    fn request_conflicts_with_flags() {
        assert!(Cli::try_parse_from(["dieline", "box", "--request", "f.json", "-l", "1"]).is_err());
    }

    #[test]
    fn table_command_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let listing = dir.path().join("box.cs");
        fs::write(
            &listing,
            "x0 = 0;\ny0 = 0;\nx1 = L;\ny1 = 0;\nlist.AddSegment(ltCut, x0, y0, x1, y1);\n",
        )
        .unwrap();
        let out = dir.path().join("table.json");
        run_table(&TableArgs {
            listing,
            output: Some(out.clone()),
        })
        .unwrap();
        let table = SegmentTable::from_json(&fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn card_defaults_to_pdf_name() {
        let cli = Cli::try_parse_from(["dieline", "card", "85", "55", "pl"]).unwrap();
        let Command::Card(args) = cli.command else {
            panic!("expected card");
        };
        let (path, format) = args.out.resolve("template_85x55mm_PL.pdf");
        assert_eq!(path, PathBuf::from("template_85x55mm_PL.pdf"));
        assert_eq!(format, Format::Pdf);
    }
}
