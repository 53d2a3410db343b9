mod test_backend_sources;
mod test_self_signed_flow;
