//! Scenario tests that drive the protocol and clock layers against a
//! recorded pin trace.


mod clock_tests;
