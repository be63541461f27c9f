use vrp::solver::genetic::search;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    search::run()
}
