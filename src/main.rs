fn main() {
    std::process::exit(plugmesh::app::startup::startup());
}
