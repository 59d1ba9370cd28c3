fn main() {
    aimdx_tasks::entry_points::aimdx();
}
