mod smoke_tests;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - smoke_tests: state wiring and the draft-to-storage hand-off
// - text_generator_mock: the suggestion pipeline against a mocked model
// - api_routes: the HTTP surface, driven through the router
