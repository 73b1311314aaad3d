mod belief_node_tests;
mod property_histogram_tests;
