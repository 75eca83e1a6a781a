fn main() -> anyhow::Result<()> {
    smartstudy_lib::run()
}
