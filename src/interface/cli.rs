use anyhow::{anyhow, bail, Context, Result};
use clap::{App, ArgMatches};
use log::info;

use shading::triangle::{TRIANGLE_FRAGMENT_SOURCE, TRIANGLE_FRAG_OUTPUT, TRIANGLE_VERTEX_SOURCE};
use shading::{Program, Shader, ShaderSource};

use crate::config::RenderConfig;
use crate::graphics::context::HeadlessGl;
use crate::graphics::scene::render_triangle;

pub fn cli_main() -> Result<()> {
    let yaml = load_yaml!("cli.yaml");

    let cli = App::from_yaml(yaml);

    let matches = cli.get_matches();

    match matches.subcommand() {
        ("check", Some(m)) => check(m),
        ("render", Some(m)) => render(m),
        ("info", Some(_)) => print_info(),
        (other, _) => bail!("unknown subcommand `{}`", other),
    }
}

/// Reads `path`, or falls back to `builtin` when no path was given.
fn load_source(path: Option<&str>, builtin: &str) -> Result<ShaderSource> {
    let source = match path {
        Some(p) => ShaderSource::from_file(p)?,
        None => ShaderSource::new(builtin)?,
    };

    Ok(source)
}

fn check(matches: &ArgMatches) -> Result<()> {
    let vert = load_source(matches.value_of("vert"), TRIANGLE_VERTEX_SOURCE)?;
    let frag = load_source(matches.value_of("frag"), TRIANGLE_FRAGMENT_SOURCE)?;

    let headless = HeadlessGl::new(&RenderConfig::default())?;
    let gl = headless.gl();

    // Compile both stages before giving up so every diagnostic gets reported
    let (vert, frag) = match (Shader::from_vert_source(gl, &vert), Shader::from_frag_source(gl, &frag)) {
        (Ok(v), Ok(f)) => (v, f),
        (v, f) => {
            let failed = [v.err(), f.err()].iter().flatten().count();
            bail!("{} of 2 shader stages failed to compile", failed);
        }
    };
    println!("vertex shader: ok");
    println!("fragment shader: ok");

    let program = Program::link(gl, &[&vert, &frag], TRIANGLE_FRAG_OUTPUT)?;
    println!("program {}: linked", program.handle().id());

    Ok(())
}

fn render(matches: &ArgMatches) -> Result<()> {
    let width = value_t!(matches, "width", u32).unwrap_or_else(|e| e.exit());
    let height = value_t!(matches, "height", u32).unwrap_or_else(|e| e.exit());
    let clear = RenderConfig::parse_color(matches.value_of("clear").unwrap_or_default())?;
    let output = matches.value_of("output").ok_or_else(|| anyhow!("--output is required"))?;

    let config = RenderConfig::new(width, height, clear)?;
    let headless = HeadlessGl::new(&config)?;

    let snapshot = render_triangle(headless.gl(), &config)?;
    snapshot
        .to_image()?
        .save(output)
        .with_context(|| format!("failed to write {}", output))?;

    info!("wrote {}", output);
    println!("{}", output);

    Ok(())
}

fn print_info() -> Result<()> {
    let headless = HeadlessGl::new(&RenderConfig::default())?;
    let gl = headless.gl();

    let report = info_report(&[
        ("Vendor", gl.vendor()),
        ("Renderer", gl.renderer()),
        ("Version", gl.version()),
        ("GLSL", gl.shading_language_version()),
    ]);
    print!("{}", report);

    Ok(())
}

/// One `Label: value` line per driver string. This is the only place `info` writes them, the
/// context setup logs them at `debug` only.
fn info_report(strings: &[(&str, Option<String>)]) -> String {
    strings
        .iter()
        .map(|(label, value)| format!("{}: {}\n", label, value.as_deref().unwrap_or("unknown")))
        .collect()
}
