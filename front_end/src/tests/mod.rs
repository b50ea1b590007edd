mod visitor_tests;
