use clap::Parser;
use kt_triangle::masses::M_PION;
use kt_triangle::{Settings, Triangle};

#[derive(Parser, Debug)]
#[command(name = "omega_scan")]
#[command(about = "Scan the ω → 3π triangle in both representations")]
struct Args {
    /// Gauss–Legendre order
    #[arg(long, short = 'n', default_value_t = 64)]
    order: usize,

    /// Half-width excluded around the pseudo-threshold
    #[arg(long, default_value_t = 1e-4)]
    exclusion: f64,

    /// Number of scan points
    #[arg(long, short = 'p', default_value_t = 25)]
    points: usize,

    /// Lower end of the scan, also the normalization point (GeV²)
    #[arg(long, default_value_t = 1e-3)]
    low: f64,

    /// Upper end of the scan (GeV²); defaults to 81 m_π²
    #[arg(long)]
    high: Option<f64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let settings = Settings {
        order: args.order,
        exclusion: args.exclusion,
        ..Settings::default()
    };
    let mut tri = Triangle::with_settings(settings)?;
    tri.set_exchange_mass(0.770, 0.145)?;
    tri.set_internal_masses(M_PION, M_PION)?;
    tri.set_external_masses(0.780, M_PION)?;

    let low = args.low;
    let high = args.high.unwrap_or(81.0 * M_PION * M_PION);
    let points = args.points.max(1);

    println!("=== ω → 3π triangle ===");
    println!("s threshold      = {}", tri.s_threshold()?);
    println!("pseudo-threshold = {}", tri.pseudo_threshold()?);
    println!("t threshold      = {}", tri.t_threshold()?);

    let start = std::time::Instant::now();
    let feyn_0 = tri.eval_feynman(low)?;
    let disp_0 = tri.eval_dispersive(low)?;
    log::info!("normalization at s = {low}: feynman {feyn_0}, dispersive {disp_0}");

    println!("\n{:>8}  {:>28}  {:>28}  {:>10}", "√s/m_π", "feynman", "dispersive", "rel. diff");
    for i in 0..points {
        let s = low + i as f64 * (high - low) / points as f64;
        let feyn = tri.eval_feynman(s)? / feyn_0;
        let disp = tri.eval_dispersive(s)? / disp_0;
        let diff = (disp - feyn).norm() / feyn.norm();
        println!(
            "{:>8.4}  {:>13.6} {:>+13.6}i  {:>13.6} {:>+13.6}i  {:>10.2e}",
            s.sqrt() / M_PION,
            feyn.re,
            feyn.im,
            disp.re,
            disp.im,
            diff
        );
    }
    log::info!("{points} points in {:.2?}", start.elapsed());

    Ok(())
}
