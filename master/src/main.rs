mod modules;
mod utilities;

fn main() -> std::io::Result<()> {
    modules::run()
}
